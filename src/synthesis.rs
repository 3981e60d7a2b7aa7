use crate::types::{
    CouncilReport, ImplementationPlan, PolicyRecommendation, Priority, RecoveryScenario,
    RiskAssessment, SimulationResult, Summary, Synthesis,
};
use crate::util::{format_int, format_money};

/// Merges stage outputs into the executive record and report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn synthesize(&self, risk: &RiskAssessment, scenarios: &[RecoveryScenario]) -> Synthesis {
        Synthesis {
            executive_summary: format!("Climate damages: {}", format_money(risk.total_damages)),
            key_findings: vec![
                format!("Risk level: {}", risk.risk_level),
                format!("{} recovery scenarios identified", scenarios.len()),
            ],
            priority_level: risk.risk_level,
            total_investment_required: scenarios.iter().map(|s| s.estimated_cost).sum(),
        }
    }

    /// Narrow two-item catalog budgeted from the synthesized investment
    /// total rather than from raw damages.
    pub fn create_policy_recommendations(&self, synthesis: &Synthesis) -> Vec<PolicyRecommendation> {
        let investment = synthesis.total_investment_required;
        let policy = |id: &str, title: &str, priority: Priority, description: &str, share: f64| {
            PolicyRecommendation {
                policy_id: id.to_string(),
                title: title.to_string(),
                category: None,
                priority,
                description: description.to_string(),
                estimated_budget: investment * share,
                timeframe: None,
                implementation_steps: Vec::new(),
                expected_outcomes: Vec::new(),
                rank: None,
                urgency_score: None,
            }
        };
        vec![
            policy(
                "POL-001",
                "Emergency Climate Damage Response Fund",
                Priority::Critical,
                "Establish dedicated emergency fund for immediate climate disaster response",
                0.15,
            ),
            policy(
                "POL-002",
                "National Climate-Resilient Infrastructure Program",
                Priority::High,
                "Comprehensive program to upgrade infrastructure with climate resilience",
                0.40,
            ),
        ]
    }

    pub fn build_report(
        &self,
        risk: RiskAssessment,
        scenarios: Vec<RecoveryScenario>,
        synthesis: Synthesis,
        policies: Vec<PolicyRecommendation>,
    ) -> CouncilReport {
        self.build_full_report(risk, scenarios, Vec::new(), synthesis, policies, Vec::new())
    }

    /// Same as [`Synthesizer::build_report`], also carrying optional
    /// simulation and implementation-plan records.
    pub fn build_full_report(
        &self,
        risk: RiskAssessment,
        scenarios: Vec<RecoveryScenario>,
        simulations: Vec<SimulationResult>,
        synthesis: Synthesis,
        policies: Vec<PolicyRecommendation>,
        implementation_plans: Vec<ImplementationPlan>,
    ) -> CouncilReport {
        let summary = Summary {
            total_damages: risk.total_damages,
            risk_level: risk.risk_level,
            total_investment_required: synthesis.total_investment_required,
            number_of_scenarios: scenarios.len(),
            number_of_policies: policies.len(),
        };
        CouncilReport {
            risk_analysis: risk,
            recovery_scenarios: scenarios,
            simulations,
            synthesis,
            policy_recommendations: policies,
            implementation_plans,
            summary,
        }
    }
}

/// Fixed-width text block for the console and the template narrator.
pub fn format_executive_summary(report: &CouncilReport) -> String {
    let s = &report.summary;
    let rule = "-".repeat(62);
    let mut out = String::new();
    out.push_str(&"=".repeat(62));
    out.push('\n');
    out.push_str("            PROJECT PHOENIX - EXECUTIVE SUMMARY\n");
    out.push_str(&"=".repeat(62));
    out.push_str("\n\n");

    out.push_str("CLIMATE RISK ASSESSMENT\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Total Climate Damages:        {}\n", format_money(s.total_damages)));
    out.push_str(&format!("Overall Risk Level:           {}\n\n", s.risk_level));

    out.push_str("RECOVERY PLANNING\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Recovery Scenarios Generated: {}\n", format_int(s.number_of_scenarios)));
    out.push_str(&format!(
        "Total Investment Required:    {}\n\n",
        format_money(s.total_investment_required)
    ));

    out.push_str("POLICY RECOMMENDATIONS\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Policy Recommendations:       {}\n", format_int(s.number_of_policies)));
    out
}
