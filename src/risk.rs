use crate::config::RiskBasis;
use crate::types::{Correlations, CountryRisk, DamageTable, RiskAssessment, RiskLevel};
use crate::util::{average, pearson};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

const TOTAL_MEDIUM_CUTOFF: f64 = 1_000_000_000.0;
const TOTAL_CRITICAL_CUTOFF: f64 = 5_000_000_000.0;
const AVERAGE_MEDIUM_CUTOFF: f64 = 100_000_000.0;
const AVERAGE_CRITICAL_CUTOFF: f64 = 500_000_000.0;

/// Aggregate and per-country damage statistics.
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor {
    basis: RiskBasis,
    top_n: usize,
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new(RiskBasis::TotalDamages, 5)
    }
}

impl RiskAssessor {
    pub fn new(basis: RiskBasis, top_n: usize) -> Self {
        Self { basis, top_n }
    }

    pub fn assess(&self, table: &DamageTable) -> RiskAssessment {
        let damages = table.damages();
        let total_damages: f64 = damages.iter().sum();
        let average_damages = average(&damages);

        let assessment = RiskAssessment {
            total_damages,
            average_damages,
            data_points: table.len(),
            country_damages: country_damages(table),
            risk_level: self.risk_level(total_damages, average_damages),
            correlations: correlations(table),
            high_risk_countries: self.high_risk_countries(table),
        };
        tracing::debug!(
            total = assessment.total_damages,
            rows = assessment.data_points,
            level = %assessment.risk_level,
            "Risk assessed"
        );
        assessment
    }

    /// Tier the configured aggregate. Each boundary value belongs to the
    /// higher tier; anything not strictly positive is `Low`.
    pub fn risk_level(&self, total_damages: f64, average_damages: f64) -> RiskLevel {
        let (value, medium_cutoff, critical_cutoff) = match self.basis {
            RiskBasis::TotalDamages => (total_damages, TOTAL_MEDIUM_CUTOFF, TOTAL_CRITICAL_CUTOFF),
            RiskBasis::AverageDamages => {
                (average_damages, AVERAGE_MEDIUM_CUTOFF, AVERAGE_CRITICAL_CUTOFF)
            }
        };
        if value <= 0.0 || value.is_nan() {
            RiskLevel::Low
        } else if value < medium_cutoff {
            RiskLevel::Medium
        } else if value < critical_cutoff {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Countries ranked by summed damage, largest first, at most `top_n`.
    /// Equal totals keep first-appearance order.
    pub fn high_risk_countries(&self, table: &DamageTable) -> Vec<CountryRisk> {
        let mut ranked = group_by_country(table);
        ranked.sort_by(|a, b| b.total_damage.partial_cmp(&a.total_damage).unwrap_or(Ordering::Equal));
        ranked.truncate(self.top_n);
        ranked
    }
}

/// Per-country totals, in first-appearance order. Empty when either the
/// country or damage column is missing.
pub(crate) fn group_by_country(table: &DamageTable) -> Vec<CountryRisk> {
    #[derive(Default)]
    struct Acc {
        total: f64,
        values: usize,
    }

    if !table.columns.country || !table.columns.damage_cost {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut map: HashMap<&str, Acc> = HashMap::new();
    for r in &table.records {
        let Some(country) = r.country.as_deref() else {
            continue;
        };
        let e = map.entry(country).or_insert_with(|| {
            order.push(country.to_string());
            Acc::default()
        });
        if let Some(d) = r.damage_cost {
            e.total += d;
            e.values += 1;
        }
    }

    order
        .into_iter()
        .map(|country| {
            let acc = &map[country.as_str()];
            let avg_damage = if acc.values == 0 {
                0.0
            } else {
                acc.total / acc.values as f64
            };
            CountryRisk {
                total_damage: acc.total,
                avg_damage,
                incident_count: acc.values,
                country,
            }
        })
        .collect()
}

fn country_damages(table: &DamageTable) -> BTreeMap<String, f64> {
    group_by_country(table)
        .into_iter()
        .map(|c| (c.country, c.total_damage))
        .collect()
}

/// Pearson coefficients of damage against CO2 and GDP over rows where both
/// values are present. A key stays `None` when its column is missing or the
/// coefficient is undefined.
pub fn correlations(table: &DamageTable) -> Correlations {
    let cols = table.columns;
    if !cols.damage_cost {
        return Correlations::default();
    }
    let paired = |other: fn(&crate::types::DamageRecord) -> Option<f64>| -> Vec<(f64, f64)> {
        table
            .records
            .iter()
            .filter_map(|r| Some((r.damage_cost?, other(r)?)))
            .collect()
    };

    Correlations {
        co2_damage_correlation: if cols.co2_emissions {
            pearson(&paired(|r| r.co2_emissions))
        } else {
            None
        },
        gdp_damage_correlation: if cols.gdp {
            pearson(&paired(|r| r.gdp))
        } else {
            None
        },
    }
}
