use crate::types::{
    FeasibilityAssessment, FeasibilityBreakdown, ImplementationPlan, Milestone,
    PolicyRecommendation, Priority, RiskAssessment, RiskLevel, Roadmap, RoadmapPhase,
};

const URGENCY_PER_WEIGHT: u32 = 25;
const FEASIBILITY_SCORE: f64 = 72.0;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn phase(n: u32, name: &str, duration: &str, activities: &[&str], deliverables: &[&str], pct: u32) -> RoadmapPhase {
    RoadmapPhase {
        phase: n,
        name: name.to_string(),
        duration: duration.to_string(),
        activities: strings(activities),
        deliverables: strings(deliverables),
        budget_allocation: format!("{}%", pct),
    }
}

/// Budget-scaled policy catalog with ranking, feasibility and roadmaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyComposer;

impl PolicyComposer {
    /// Four policies budgeted from `total_damages` (shares 0.15, 0.35, 0.20
    /// and 0.30). Only the emergency framework reacts to the risk tier.
    pub fn compose(&self, risk: &RiskAssessment) -> Vec<PolicyRecommendation> {
        let total = risk.total_damages;
        let emergency_priority = match risk.risk_level {
            RiskLevel::High | RiskLevel::Critical => Priority::Critical,
            RiskLevel::Low | RiskLevel::Medium => Priority::High,
        };

        vec![
            PolicyRecommendation {
                policy_id: "POL-001".to_string(),
                title: "Climate Emergency Response Framework".to_string(),
                category: Some("Emergency Management".to_string()),
                priority: emergency_priority,
                description: "Establish comprehensive emergency response protocols for climate disasters".to_string(),
                estimated_budget: total * 0.15,
                timeframe: Some("0-6 months".to_string()),
                implementation_steps: strings(&[
                    "Create national climate emergency coordination center",
                    "Deploy early warning systems",
                    "Establish emergency relief funds",
                    "Train first responders in climate disaster management",
                ]),
                expected_outcomes: strings(&[
                    "Reduce emergency response time by 50%",
                    "Save lives and minimize immediate damages",
                    "Coordinate multi-agency responses effectively",
                ]),
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-002".to_string(),
                title: "Climate-Resilient Infrastructure Development".to_string(),
                category: Some("Infrastructure".to_string()),
                priority: Priority::High,
                description: "Modernize infrastructure to withstand climate impacts".to_string(),
                estimated_budget: total * 0.35,
                timeframe: Some("6-36 months".to_string()),
                implementation_steps: strings(&[
                    "Conduct infrastructure vulnerability assessments",
                    "Upgrade critical infrastructure (power, water, transport)",
                    "Implement green infrastructure solutions",
                    "Establish building codes for climate resilience",
                ]),
                expected_outcomes: strings(&[
                    "Reduce infrastructure damage by 40%",
                    "Improve service continuity during extreme events",
                    "Create construction jobs",
                ]),
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-003".to_string(),
                title: "National Climate Finance Mechanism".to_string(),
                category: Some("Finance".to_string()),
                priority: Priority::High,
                description: "Create dedicated funding mechanism for climate adaptation".to_string(),
                estimated_budget: total * 0.20,
                timeframe: Some("3-12 months".to_string()),
                implementation_steps: strings(&[
                    "Establish climate adaptation fund",
                    "Create green bonds program",
                    "Implement carbon pricing mechanism",
                    "Develop insurance schemes for climate risks",
                ]),
                expected_outcomes: strings(&[
                    "Mobilize dedicated capital for climate action",
                    "Incentivize private sector investment",
                    "Provide financial protection for vulnerable populations",
                ]),
                rank: None,
                urgency_score: None,
            },
            PolicyRecommendation {
                policy_id: "POL-004".to_string(),
                title: "Accelerated Renewable Energy Transition".to_string(),
                category: Some("Energy".to_string()),
                priority: Priority::Medium,
                description: "Transition to 100% renewable energy by 2040".to_string(),
                estimated_budget: total * 0.30,
                timeframe: Some("1-10 years".to_string()),
                implementation_steps: strings(&[
                    "Phase out fossil fuel subsidies",
                    "Invest in solar, wind, and hydro infrastructure",
                    "Modernize power grid for distributed generation",
                    "Provide incentives for renewable energy adoption",
                ]),
                expected_outcomes: strings(&[
                    "Reduce carbon emissions by 70% by 2035",
                    "Create 500,000 green energy jobs",
                    "Improve energy security and independence",
                ]),
                rank: None,
                urgency_score: None,
            },
        ]
    }

    /// Stable sort by priority weight, highest first, then number the result
    /// from 1 and set `urgency_score = weight * 25`.
    pub fn prioritize(&self, mut policies: Vec<PolicyRecommendation>) -> Vec<PolicyRecommendation> {
        policies.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));
        for (idx, policy) in policies.iter_mut().enumerate() {
            policy.rank = Some(idx + 1);
            policy.urgency_score = Some(policy.priority.weight() * URGENCY_PER_WEIGHT);
        }
        policies
    }

    /// Fixed feasibility template; every policy gets the same score and
    /// breakdown.
    pub fn assess_feasibility(&self, policy: &PolicyRecommendation) -> FeasibilityAssessment {
        FeasibilityAssessment {
            policy_id: policy.policy_id.clone(),
            policy_title: policy.title.clone(),
            feasibility_score: FEASIBILITY_SCORE,
            assessment: FeasibilityBreakdown {
                political_feasibility: "Medium".to_string(),
                technical_feasibility: "High".to_string(),
                financial_feasibility: "Medium".to_string(),
                social_acceptance: "High".to_string(),
                implementation_complexity: "Medium".to_string(),
            },
            barriers: strings(&[
                "Political resistance from fossil fuel interests",
                "Initial high capital costs",
                "Need for technical capacity building",
            ]),
            enablers: strings(&[
                "Growing public awareness of climate risks",
                "Declining renewable energy costs",
                "International climate commitments",
            ]),
            risk_factors: strings(&[
                "Budget constraints",
                "Coordination challenges across agencies",
                "Potential delays in procurement",
            ]),
        }
    }

    /// Four-phase rollout. Allocations are 10/20/50/20 percent of the
    /// policy budget.
    pub fn build_roadmap(&self, policy: &PolicyRecommendation) -> Roadmap {
        let milestone = |month: u32, text: &str| Milestone {
            month,
            milestone: text.to_string(),
        };

        Roadmap {
            policy_id: policy.policy_id.clone(),
            policy_title: policy.title.clone(),
            phases: vec![
                phase(
                    1,
                    "Planning and Design",
                    "Months 1-3",
                    &[
                        "Conduct stakeholder consultations",
                        "Develop detailed policy framework",
                        "Secure budget approval",
                        "Establish implementation team",
                    ],
                    &["Policy framework document", "Budget allocation", "Implementation team roster"],
                    10,
                ),
                phase(
                    2,
                    "Pilot Implementation",
                    "Months 4-9",
                    &[
                        "Launch pilot programs in selected regions",
                        "Monitor and evaluate pilot results",
                        "Gather stakeholder feedback",
                        "Refine implementation approach",
                    ],
                    &["Pilot program reports", "Lessons learned document", "Revised implementation plan"],
                    20,
                ),
                phase(
                    3,
                    "Full-Scale Rollout",
                    "Months 10-24",
                    &[
                        "Scale up to national level",
                        "Provide training and capacity building",
                        "Establish monitoring systems",
                        "Coordinate with local governments",
                    ],
                    &["National implementation", "Training materials", "M&E framework"],
                    50,
                ),
                phase(
                    4,
                    "Monitoring and Optimization",
                    "Months 25+",
                    &[
                        "Continuous performance monitoring",
                        "Impact evaluation",
                        "Policy adjustments based on data",
                        "Knowledge sharing and documentation",
                    ],
                    &[
                        "Annual impact reports",
                        "Policy optimization recommendations",
                        "Best practices documentation",
                    ],
                    20,
                ),
            ],
            key_milestones: vec![
                milestone(3, "Policy framework approved"),
                milestone(9, "Pilot completed successfully"),
                milestone(12, "50% national coverage achieved"),
                milestone(24, "100% national coverage achieved"),
            ],
            success_metrics: strings(&[
                "Number of beneficiaries reached",
                "Reduction in climate damages",
                "Stakeholder satisfaction score",
                "Budget utilization rate",
            ]),
        }
    }

    pub fn plan(&self, policy: &PolicyRecommendation) -> ImplementationPlan {
        ImplementationPlan {
            policy_id: policy.policy_id.clone(),
            feasibility: self.assess_feasibility(policy),
            roadmap: self.build_roadmap(policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Correlations;
    use std::collections::BTreeMap;

    fn risk(total: f64, level: RiskLevel) -> RiskAssessment {
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
    fn test_compose_budgets() {
        let policies = PolicyComposer.compose(&risk(1_000.0, RiskLevel::Medium));
        assert_eq!(policies.len(), 4);
        let budgets: Vec<f64> = policies.iter().map(|p| p.estimated_budget).collect();
        for (got, want) in budgets.iter().zip([150.0, 350.0, 200.0, 300.0]) {
            assert!((got - want).abs() < 1e-9);
        }
        assert!(policies.iter().all(|p| p.rank.is_none()));
    }

    #[test]
    fn test_emergency_priority_follows_risk() {
        for (level, want) in [
            (RiskLevel::Low, Priority::High),
            (RiskLevel::Medium, Priority::High),
            (RiskLevel::High, Priority::Critical),
            (RiskLevel::Critical, Priority::Critical),
        ] {
            let policies = PolicyComposer.compose(&risk(1.0, level));
            assert_eq!(policies[0].priority, want);
            assert_eq!(policies[3].priority, Priority::Medium);
        }
    }

    #[test]
    fn test_prioritize_is_stable() {
        let policies = PolicyComposer.compose(&risk(1.0, RiskLevel::Medium));
        let ranked = PolicyComposer.prioritize(policies);
        let ids: Vec<&str> = ranked.iter().map(|p| p.policy_id.as_str()).collect();
        // POL-001..003 are all HIGH here and keep their order.
        assert_eq!(ids, vec!["POL-001", "POL-002", "POL-003", "POL-004"]);
        let ranks: Vec<usize> = ranked.iter().filter_map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(ranked[0].urgency_score, Some(75));
        assert_eq!(ranked[3].urgency_score, Some(50));
    }

    #[test]
    fn test_prioritize_moves_critical_first() {
        let mut policies = PolicyComposer.compose(&risk(1.0, RiskLevel::Medium));
        policies.reverse();
        policies[1].priority = Priority::Critical; // POL-003
        let ranked = PolicyComposer.prioritize(policies);
        let ids: Vec<&str> = ranked.iter().map(|p| p.policy_id.as_str()).collect();
        assert_eq!(ids, vec!["POL-003", "POL-002", "POL-001", "POL-004"]);
        assert_eq!(ranked[0].urgency_score, Some(100));
    }

    #[test]
    fn test_feasibility_is_flat() {
        let policies = PolicyComposer.compose(&risk(1.0, RiskLevel::High));
        for p in &policies {
            let f = PolicyComposer.assess_feasibility(p);
            assert_eq!(f.feasibility_score, 72.0);
            assert_eq!(f.policy_id, p.policy_id);
            assert_eq!(f.barriers.len(), 3);
        }
    }

    #[test]
    fn test_roadmap_allocations_total_100() {
        let policy = &PolicyComposer.compose(&risk(1.0, RiskLevel::High))[1];
        let roadmap = PolicyComposer.build_roadmap(policy);
        assert_eq!(roadmap.phases.len(), 4);
        let total: u32 = roadmap
            .phases
            .iter()
            .map(|p| p.budget_allocation.trim_end_matches('%').parse::<u32>().unwrap())
            .sum();
        assert_eq!(total, 100);
        let months: Vec<u32> = roadmap.key_milestones.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![3, 9, 12, 24]);
        assert_eq!(roadmap.policy_id, "POL-002");
    }
}
