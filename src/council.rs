//! Pipeline orchestration.
//!
//! Risk -> scenarios -> (simulations) -> policies -> synthesis -> report.
//! Each stage gets the previous stage's output by reference and returns a
//! fresh record, so running the same table twice yields the same report.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::{CouncilConfig, PolicyCatalog};
use crate::policy::PolicyComposer;
use crate::risk::RiskAssessor;
use crate::scenarios::ScenarioGenerator;
use crate::simulation::SimulationEngine;
use crate::synthesis::{format_executive_summary, Synthesizer};
use crate::types::{CouncilReport, DamageTable};

/// Optional narrative enrichment of a finished report.
///
/// Implementations may call out to a generative model; the pipeline itself
/// never does.
pub trait Narrator {
    fn narrate(&self, report: &CouncilReport) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn narrate(&self, _report: &CouncilReport) -> Option<String> {
        None
    }
}

/// Narrates with the fixed executive-summary template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl Narrator for TemplateNarrator {
    fn narrate(&self, report: &CouncilReport) -> Option<String> {
        Some(format_executive_summary(report))
    }
}

impl<F> Narrator for F
where
    F: Fn(&CouncilReport) -> Option<String>,
{
    fn narrate(&self, report: &CouncilReport) -> Option<String> {
        self(report)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarratedReport {
    pub report: CouncilReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Council {
    config: CouncilConfig,
    assessor: RiskAssessor,
    scenarios: ScenarioGenerator,
    simulation: SimulationEngine,
    composer: PolicyComposer,
    synthesizer: Synthesizer,
}

impl Council {
    pub fn new(config: CouncilConfig) -> Self {
        Self {
            assessor: RiskAssessor::new(config.risk_basis, config.top_n),
            scenarios: ScenarioGenerator,
            simulation: SimulationEngine,
            composer: PolicyComposer,
            synthesizer: Synthesizer,
            config,
        }
    }

    pub fn config(&self) -> &CouncilConfig {
        &self.config
    }

    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn run(&self, table: &DamageTable) -> CouncilReport {
        let risk = self.assessor.assess(table);
        info!(level = %risk.risk_level, total = risk.total_damages, "Risk analysis complete");

        let scenarios = self.scenarios.generate(&risk);
        info!(count = scenarios.len(), "Recovery scenarios generated");

        let simulations = if self.config.simulate {
            let sims: Vec<_> = scenarios.iter().map(|s| self.simulation.simulate(s)).collect();
            debug!(count = sims.len(), "Scenarios simulated");
            sims
        } else {
            Vec::new()
        };

        let synthesis = self.synthesizer.synthesize(&risk, &scenarios);

        let (policies, plans) = match self.config.policy_catalog {
            PolicyCatalog::Composer => {
                let ranked = self.composer.prioritize(self.composer.compose(&risk));
                let plans = if self.config.implementation_plans {
                    ranked.iter().map(|p| self.composer.plan(p)).collect()
                } else {
                    Vec::new()
                };
                (ranked, plans)
            }
            PolicyCatalog::Synthesis => {
                (self.synthesizer.create_policy_recommendations(&synthesis), Vec::new())
            }
        };
        info!(count = policies.len(), catalog = ?self.config.policy_catalog, "Policy recommendations created");

        self.synthesizer
            .build_full_report(risk, scenarios, simulations, synthesis, policies, plans)
    }

    pub fn run_with_narrator(&self, table: &DamageTable, narrator: &dyn Narrator) -> NarratedReport {
        let report = self.run(table);
        let narrative = narrator.narrate(&report);
        NarratedReport { report, narrative }
    }
}

impl Default for Council {
    fn default() -> Self {
        Self::new(CouncilConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Columns, DamageRecord, RiskLevel};

    fn sample() -> DamageTable {
        let row = |c: &str, d: f64| DamageRecord {
            country: Some(c.to_string()),
            damage_cost: Some(d),
            ..Default::default()
        };
        DamageTable::new(Columns::all(), vec![row("A", 1_000_000.0), row("B", 2_000_000.0)])
    }

    #[test]
    fn test_default_run_uses_composer() {
        let report = Council::default().run(&sample());
        assert_eq!(report.summary.number_of_policies, 4);
        assert_eq!(report.policy_recommendations[0].rank, Some(1));
        assert!(report.simulations.is_empty());
        assert!(report.implementation_plans.is_empty());
    }

    #[test]
    fn test_optional_stages() {
        let config = CouncilConfig {
            simulate: true,
            implementation_plans: true,
            ..Default::default()
        };
        let report = Council::new(config).run(&sample());
        assert_eq!(report.simulations.len(), 3);
        assert_eq!(report.implementation_plans.len(), 4);
        assert_eq!(report.simulations[0].outcomes.best_case.jobs_created, 4);
    }

    #[test]
    fn test_synthesis_catalog() {
        let config = CouncilConfig {
            policy_catalog: PolicyCatalog::Synthesis,
            implementation_plans: true,
            ..Default::default()
        };
        let report = Council::new(config).run(&sample());
        assert_eq!(report.summary.number_of_policies, 2);
        assert!(report.implementation_plans.is_empty());
        assert_eq!(report.summary.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_narrators() {
        let council = Council::default();
        let silent = council.run_with_narrator(&sample(), &SilentNarrator);
        assert_eq!(silent.narrative, None);

        let templated = council.run_with_narrator(&sample(), &TemplateNarrator);
        assert!(templated.narrative.unwrap().contains("EXECUTIVE SUMMARY"));

        let custom = |r: &CouncilReport| Some(format!("{} policies", r.summary.number_of_policies));
        let narrated = council.run_with_narrator(&sample(), &custom);
        assert_eq!(narrated.narrative.as_deref(), Some("4 policies"));
        assert_eq!(narrated.report, silent.report);
    }
}
