use crate::types::{RecoveryScenario, RiskAssessment};

struct ScenarioTemplate {
    name: &'static str,
    timeframe: &'static str,
    focus: &'static str,
    share: f64,
    expected_impact: &'static str,
    key_actions: &'static [&'static str],
}

/// Fixed response framework; shares sum to 1.0.
const CATALOG: [ScenarioTemplate; 3] = [
    ScenarioTemplate {
        name: "Immediate Emergency Response",
        timeframe: "0-6 months",
        focus: "Emergency relief and immediate damage mitigation",
        share: 0.15,
        expected_impact: "Prevent further immediate losses, stabilize affected regions",
        key_actions: &[
            "Deploy emergency relief funds",
            "Establish disaster response coordination",
            "Provide immediate financial aid to affected populations",
            "Assess and secure critical infrastructure",
        ],
    },
    ScenarioTemplate {
        name: "Short-term Recovery & Rebuilding",
        timeframe: "6-24 months",
        focus: "Infrastructure rebuilding and economic stabilization",
        share: 0.35,
        expected_impact: "Restore 60-70% of economic activity, rebuild critical infrastructure",
        key_actions: &[
            "Rebuild damaged infrastructure with climate-resilient designs",
            "Provide business recovery loans and grants",
            "Implement temporary economic stimulus programs",
            "Establish early warning systems",
        ],
    },
    ScenarioTemplate {
        name: "Long-term Climate Resilience",
        timeframe: "2-10 years",
        focus: "Systemic resilience building and prevention",
        share: 0.50,
        expected_impact: "Reduce future climate damages by 40-60%, build sustainable economy",
        key_actions: &[
            "Invest in renewable energy infrastructure",
            "Implement comprehensive climate adaptation strategies",
            "Develop climate-smart agriculture and industry",
            "Create green jobs and sustainable economic sectors",
            "Establish climate risk insurance mechanisms",
        ],
    },
];

/// Builds the recovery scenarios for an assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioGenerator;

impl ScenarioGenerator {
    /// The catalog is the same for every risk tier; only the costs scale
    /// with `total_damages`.
    pub fn generate(&self, risk: &RiskAssessment) -> Vec<RecoveryScenario> {
        tracing::debug!(level = %risk.risk_level, "Generating recovery scenarios");
        CATALOG
            .iter()
            .map(|t| RecoveryScenario {
                scenario_name: t.name.to_string(),
                timeframe: t.timeframe.to_string(),
                focus: t.focus.to_string(),
                estimated_cost: risk.total_damages * t.share,
                expected_impact: t.expected_impact.to_string(),
                key_actions: t.key_actions.iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Correlations, RiskLevel};
    use std::collections::BTreeMap;

    fn assessment(total: f64, level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            total_damages: total,
            average_damages: total,
            data_points: 1,
            country_damages: BTreeMap::new(),
            risk_level: level,
            correlations: Correlations::default(),
            high_risk_countries: Vec::new(),
        }
    }

    #[test]
    fn test_shares_sum_to_one() {
        let total: f64 = CATALOG.iter().map(|t| t.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_costs_scale_with_damages() {
        let scenarios = ScenarioGenerator.generate(&assessment(3_000_000.0, RiskLevel::Medium));
        let costs: Vec<f64> = scenarios.iter().map(|s| s.estimated_cost).collect();
        for (got, want) in costs.iter().zip([450_000.0, 1_050_000.0, 1_500_000.0]) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
        let sum: f64 = costs.iter().sum();
        assert!((sum - 3_000_000.0).abs() < 1e-6);
        assert_eq!(scenarios[2].key_actions.len(), 5);
    }

    #[test]
    fn test_catalog_ignores_risk_level() {
        let low = ScenarioGenerator.generate(&assessment(10.0, RiskLevel::Low));
        let critical = ScenarioGenerator.generate(&assessment(10.0, RiskLevel::Critical));
        assert_eq!(low, critical);
    }
}
