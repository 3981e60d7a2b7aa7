use crate::types::{CaseOutcome, RecoveryScenario, SimulationOutcomes, SimulationResult};

struct CaseTemplate {
    damage_reduction: &'static str,
    economic_growth: &'static str,
    cost_per_job: f64,
    roi: f64,
}

const BEST: CaseTemplate = CaseTemplate {
    damage_reduction: "60-70%",
    economic_growth: "+3% to +5%",
    cost_per_job: 100_000.0,
    roi: 6.0,
};

const EXPECTED: CaseTemplate = CaseTemplate {
    damage_reduction: "40-50%",
    economic_growth: "+2% to +3%",
    cost_per_job: 150_000.0,
    roi: 4.0,
};

const WORST: CaseTemplate = CaseTemplate {
    damage_reduction: "20-30%",
    economic_growth: "0% to +1%",
    cost_per_job: 250_000.0,
    roi: 2.0,
};

const RISK_FACTORS: [&str; 4] = [
    "Political stability and policy continuity",
    "International cooperation and funding",
    "Technology adoption rates",
    "Public acceptance and behavioral change",
];

/// Best/expected/worst projections for a single scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationEngine;

impl SimulationEngine {
    pub fn simulate(&self, scenario: &RecoveryScenario) -> SimulationResult {
        let cost = scenario.estimated_cost;
        SimulationResult {
            scenario: scenario.scenario_name.clone(),
            investment: cost,
            outcomes: SimulationOutcomes {
                best_case: project(&BEST, cost),
                expected_case: project(&EXPECTED, cost),
                worst_case: project(&WORST, cost),
            },
            risk_factors: RISK_FACTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn project(case: &CaseTemplate, cost: f64) -> CaseOutcome {
    // Negative costs are accepted and floor to zero or negative job counts.
    CaseOutcome {
        damage_reduction_pct_range: case.damage_reduction.to_string(),
        economic_growth_range: case.economic_growth.to_string(),
        jobs_created: (cost / case.cost_per_job).floor() as i64,
        roi: case.roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(cost: f64) -> RecoveryScenario {
        RecoveryScenario {
            scenario_name: "Long-term Climate Resilience".to_string(),
            timeframe: "2-10 years".to_string(),
            focus: String::new(),
            estimated_cost: cost,
            expected_impact: String::new(),
            key_actions: Vec::new(),
        }
    }

    #[test]
    fn test_jobs_and_roi_per_case() {
        let result = SimulationEngine.simulate(&scenario(1_500_000.0));
        assert_eq!(result.scenario, "Long-term Climate Resilience");
        assert_eq!(result.investment, 1_500_000.0);
        assert_eq!(result.outcomes.best_case.jobs_created, 15);
        assert_eq!(result.outcomes.expected_case.jobs_created, 10);
        assert_eq!(result.outcomes.worst_case.jobs_created, 6);
        assert_eq!(result.outcomes.best_case.roi, 6.0);
        assert_eq!(result.outcomes.expected_case.roi, 4.0);
        assert_eq!(result.outcomes.worst_case.roi, 2.0);
        assert_eq!(result.risk_factors.len(), 4);
    }

    #[test]
    fn test_jobs_floor() {
        let result = SimulationEngine.simulate(&scenario(99_999.0));
        assert_eq!(result.outcomes.best_case.jobs_created, 0);
    }

    #[test]
    fn test_negative_cost_is_valid() {
        let result = SimulationEngine.simulate(&scenario(-250_000.0));
        assert_eq!(result.outcomes.worst_case.jobs_created, -1);
        assert_eq!(result.outcomes.best_case.jobs_created, -3);
    }
}
