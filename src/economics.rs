// Economic impact, investment sizing and recovery modelling.
//
// All divisions are guarded: a zero or negative denominator yields 0.
use crate::types::DamageTable;
use crate::util::ratio_or_zero;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_RECOVERY_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicImpact {
    pub total_economic_loss: f64,
    pub gdp_impact_percentage: f64,
    pub affected_countries: usize,
    pub sector_impacts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiProjection {
    pub expected_damage_reduction: String,
    pub payback_period_years: String,
    pub benefit_cost_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentNeeds {
    pub immediate_relief: f64,
    pub short_term_recovery: f64,
    pub long_term_resilience: f64,
    pub total_investment_required: f64,
    pub roi_projection: RoiProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryPhase {
    pub phase: String,
    pub duration: String,
    pub gdp_impact: String,
    pub employment_impact: String,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryTimeline {
    pub country: String,
    pub baseline_damage: f64,
    pub recovery_phases: Vec<RecoveryPhase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Proceed,
    Reconsider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBenefit {
    pub investment: f64,
    pub expected_benefits: f64,
    pub benefit_cost_ratio: f64,
    pub net_present_value: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorShare {
    pub sector: String,
    pub total_damage: f64,
    pub percentage_of_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectorVulnerability {
    pub high_risk_sectors: Vec<SectorShare>,
    pub medium_risk_sectors: Vec<SectorShare>,
    pub low_risk_sectors: Vec<SectorShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayStep {
    pub period: String,
    pub gdp_impact: String,
    pub recovery_investment: f64,
    pub expected_recovery: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryModel {
    pub country: String,
    pub baseline_damage: f64,
    pub recovery_pathway: Vec<PathwayStep>,
    pub total_investment_needed: f64,
    pub roi_estimate: String,
}

/// Summed damage per event type, skipping rows without a type or value.
fn damage_by_sector(table: &DamageTable) -> Vec<(String, f64)> {
    if !table.columns.event_type || !table.columns.damage_cost {
        return Vec::new();
    }
    let mut sectors: Vec<(String, f64)> = Vec::new();
    for r in &table.records {
        let (Some(sector), Some(d)) = (r.event_type.as_deref(), r.damage_cost) else {
            continue;
        };
        match sectors.iter_mut().find(|(s, _)| s.as_str() == sector) {
            Some(entry) => entry.1 += d,
            None => sectors.push((sector.to_string(), d)),
        }
    }
    sectors
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicAnalyzer;

impl EconomicAnalyzer {
    pub fn economic_impact(&self, table: &DamageTable) -> EconomicImpact {
        let total_economic_loss: f64 = table.damages().iter().sum();

        let affected_countries = if table.columns.country && table.columns.damage_cost {
            table
                .records
                .iter()
                .filter_map(|r| r.country.as_deref())
                .collect::<HashSet<_>>()
                .len()
        } else {
            0
        };

        let gdp_impact_percentage = if table.columns.gdp && table.columns.damage_cost {
            let total_gdp: f64 = table.records.iter().filter_map(|r| r.gdp).sum();
            ratio_or_zero(total_economic_loss, total_gdp) * 100.0
        } else {
            0.0
        };

        EconomicImpact {
            total_economic_loss,
            gdp_impact_percentage,
            affected_countries,
            sector_impacts: damage_by_sector(table).into_iter().collect(),
        }
    }

    pub fn investment_needs(&self, table: &DamageTable, recovery_multiplier: f64) -> InvestmentNeeds {
        let total: f64 = table.damages().iter().sum();
        InvestmentNeeds {
            immediate_relief: total * 0.15,
            short_term_recovery: total * 0.35,
            long_term_resilience: total * 0.50,
            total_investment_required: total * recovery_multiplier,
            roi_projection: RoiProjection {
                expected_damage_reduction: "40-60%".to_string(),
                payback_period_years: "5-10".to_string(),
                benefit_cost_ratio: 3.0,
            },
        }
    }

    pub fn recovery_timeline(&self, baseline_damage: f64, country: &str) -> RecoveryTimeline {
        let phase = |name: &str, duration: &str, gdp: &str, employment: &str, share: f64| RecoveryPhase {
            phase: name.to_string(),
            duration: duration.to_string(),
            gdp_impact: gdp.to_string(),
            employment_impact: employment.to_string(),
            estimated_cost: baseline_damage * share,
        };
        RecoveryTimeline {
            country: country.to_string(),
            baseline_damage,
            recovery_phases: vec![
                phase("Emergency Response", "0-6 months", "-5% to -8%", "High unemployment", 0.15),
                phase("Reconstruction", "6-24 months", "-2% to -4%", "Gradual recovery", 0.35),
                phase("Long-term Recovery", "2-5 years", "0% to +2%", "Full recovery", 0.50),
            ],
        }
    }

    pub fn cost_benefit(&self, investment: f64, expected_damage_reduction: f64) -> CostBenefit {
        let benefit_cost_ratio = ratio_or_zero(expected_damage_reduction, investment);
        CostBenefit {
            investment,
            expected_benefits: expected_damage_reduction,
            benefit_cost_ratio,
            net_present_value: expected_damage_reduction - investment,
            recommendation: if benefit_cost_ratio > 1.0 {
                Recommendation::Proceed
            } else {
                Recommendation::Reconsider
            },
        }
    }

    /// Sectors bucketed by share of total damage: above 30% high, above 15%
    /// medium, otherwise low. Each bucket is ordered largest first.
    pub fn sector_vulnerability(&self, table: &DamageTable) -> SectorVulnerability {
        let mut sectors = damage_by_sector(table);
        sectors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let total: f64 = sectors.iter().map(|(_, d)| d).sum();

        let mut out = SectorVulnerability::default();
        for (sector, damage) in sectors {
            let share = SectorShare {
                percentage_of_total: ratio_or_zero(damage, total) * 100.0,
                total_damage: damage,
                sector,
            };
            if share.percentage_of_total > 30.0 {
                out.high_risk_sectors.push(share);
            } else if share.percentage_of_total > 15.0 {
                out.medium_risk_sectors.push(share);
            } else {
                out.low_risk_sectors.push(share);
            }
        }
        out
    }
}

/// Multi-year recovery pathway for a single country.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryModeler;

impl RecoveryModeler {
    pub fn model_economic_recovery(&self, country: &str, baseline_damage: f64) -> RecoveryModel {
        let step = |period: &str, gdp: &str, share: f64, recovery: &str| PathwayStep {
            period: period.to_string(),
            gdp_impact: gdp.to_string(),
            recovery_investment: baseline_damage * share,
            expected_recovery: recovery.to_string(),
        };
        RecoveryModel {
            country: country.to_string(),
            baseline_damage,
            recovery_pathway: vec![
                step("year_1", "-5% to -8%", 0.15, "20-25%"),
                step("year_2", "-2% to -4%", 0.25, "50-60%"),
                step("year_3_5", "0% to +2%", 0.40, "85-95%"),
                step("year_6_10", "+2% to +5%", 0.30, "100%+ (with resilience dividend)"),
            ],
            total_investment_needed: baseline_damage * 1.10,
            roi_estimate: "Every $1 invested yields $4-6 in prevented future damages".to_string(),
        }
    }
}
