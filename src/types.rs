// Typed records flowing between the pipeline stages.
//
// Every stage returns a freshly built value from this module; nothing is
// shared or mutated across stage boundaries.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

/// One row of the input table. Empty cells are `None` and are skipped by
/// every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub country: Option<String>,
    pub year: Option<i32>,
    pub damage_cost: Option<f64>,
    pub co2_emissions: Option<f64>,
    pub gdp: Option<f64>,
    pub event_type: Option<String>,
}

/// Which headers the source table actually carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub country: bool,
    pub year: bool,
    pub damage_cost: bool,
    pub co2_emissions: bool,
    pub gdp: bool,
    pub event_type: bool,
}

impl Columns {
    pub fn all() -> Self {
        Columns {
            country: true,
            year: true,
            damage_cost: true,
            co2_emissions: true,
            gdp: true,
            event_type: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageTable {
    pub columns: Columns,
    pub records: Vec<DamageRecord>,
}

impl DamageTable {
    pub fn new(columns: Columns, records: Vec<DamageRecord>) -> Self {
        DamageTable { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Present `damage_cost` values in input order, or nothing when the
    /// column is absent.
    pub fn damages(&self) -> Vec<f64> {
        if !self.columns.damage_cost {
            return Vec::new();
        }
        self.records.iter().filter_map(|r| r.damage_cost).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Ordering weight used when ranking policies.
    pub fn weight(&self) -> u32 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Correlations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_damage_correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdp_damage_correlation: Option<f64>,
}

impl Correlations {
    pub fn is_empty(&self) -> bool {
        self.co2_damage_correlation.is_none() && self.gdp_damage_correlation.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRisk {
    pub country: String,
    pub total_damage: f64,
    pub avg_damage: f64,
    pub incident_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub total_damages: f64,
    pub average_damages: f64,
    pub data_points: usize,
    pub country_damages: BTreeMap<String, f64>,
    pub risk_level: RiskLevel,
    pub correlations: Correlations,
    pub high_risk_countries: Vec<CountryRisk>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryScenario {
    pub scenario_name: String,
    pub timeframe: String,
    pub focus: String,
    pub estimated_cost: f64,
    pub expected_impact: String,
    pub key_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub damage_reduction_pct_range: String,
    pub economic_growth_range: String,
    pub jobs_created: i64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcomes {
    pub best_case: CaseOutcome,
    pub expected_case: CaseOutcome,
    pub worst_case: CaseOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub scenario: String,
    pub investment: f64,
    pub outcomes: SimulationOutcomes,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRecommendation {
    pub policy_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub priority: Priority,
    pub description: String,
    pub estimated_budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implementation_steps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_outcomes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityBreakdown {
    pub political_feasibility: String,
    pub technical_feasibility: String,
    pub financial_feasibility: String,
    pub social_acceptance: String,
    pub implementation_complexity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityAssessment {
    pub policy_id: String,
    pub policy_title: String,
    pub feasibility_score: f64,
    pub assessment: FeasibilityBreakdown,
    pub barriers: Vec<String>,
    pub enablers: Vec<String>,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPhase {
    pub phase: u32,
    pub name: String,
    pub duration: String,
    pub activities: Vec<String>,
    pub deliverables: Vec<String>,
    pub budget_allocation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub month: u32,
    pub milestone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roadmap {
    pub policy_id: String,
    pub policy_title: String,
    pub phases: Vec<RoadmapPhase>,
    pub key_milestones: Vec<Milestone>,
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplementationPlan {
    pub policy_id: String,
    pub feasibility: FeasibilityAssessment,
    pub roadmap: Roadmap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub priority_level: RiskLevel,
    pub total_investment_required: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_damages: f64,
    pub risk_level: RiskLevel,
    pub total_investment_required: f64,
    pub number_of_scenarios: usize,
    pub number_of_policies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouncilReport {
    pub risk_analysis: RiskAssessment,
    pub recovery_scenarios: Vec<RecoveryScenario>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub simulations: Vec<SimulationResult>,
    pub synthesis: Synthesis,
    pub policy_recommendations: Vec<PolicyRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implementation_plans: Vec<ImplementationPlan>,
    pub summary: Summary,
}

// Console/CSV rows. Numbers are pre-formatted with thousands separators.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountryRiskRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "TotalDamage")]
    #[tabled(rename = "TotalDamage")]
    pub total_damage: String,
    #[serde(rename = "AvgDamage")]
    #[tabled(rename = "AvgDamage")]
    pub avg_damage: String,
    #[serde(rename = "Incidents")]
    #[tabled(rename = "Incidents")]
    pub incident_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ScenarioRow {
    #[serde(rename = "Scenario")]
    #[tabled(rename = "Scenario")]
    pub scenario_name: String,
    #[serde(rename = "Timeframe")]
    #[tabled(rename = "Timeframe")]
    pub timeframe: String,
    #[serde(rename = "EstimatedCost")]
    #[tabled(rename = "EstimatedCost")]
    pub estimated_cost: String,
    #[serde(rename = "Actions")]
    #[tabled(rename = "Actions")]
    pub actions: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PolicyRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "PolicyId")]
    #[tabled(rename = "PolicyId")]
    pub policy_id: String,
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Priority")]
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Urgency")]
    #[tabled(rename = "Urgency")]
    pub urgency: String,
}
