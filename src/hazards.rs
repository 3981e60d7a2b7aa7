use crate::risk::group_by_country;
use crate::types::DamageTable;
use crate::util::{average, quantile};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_EXTREME_PERCENTILE: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeEvent {
    pub year: Option<i32>,
    pub country: Option<String>,
    pub damage_cost: f64,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalVulnerability {
    pub country: String,
    pub total_damage: f64,
    pub avg_damage: f64,
    pub event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProjection {
    pub projection_period: u32,
    pub risk_trend: String,
    pub confidence_level: String,
    pub key_risks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_annual_increase_pct: Option<f64>,
}

/// Extreme-event detection and damage trends.
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardAnalyzer;

impl HazardAnalyzer {
    /// Rows whose damage is strictly above the given percentile of all
    /// damage values, in input order.
    pub fn detect_extreme_events(&self, table: &DamageTable, percentile: f64) -> Vec<ExtremeEvent> {
        let Some(threshold) = quantile(&table.damages(), percentile / 100.0) else {
            return Vec::new();
        };
        table
            .records
            .iter()
            .filter_map(|r| {
                let d = r.damage_cost?;
                (d > threshold).then(|| ExtremeEvent {
                    year: r.year,
                    country: r.country.clone(),
                    damage_cost: d,
                    event_type: r.event_type.clone(),
                })
            })
            .collect()
    }

    /// Per-country totals with a score relative to the worst-hit country.
    pub fn regional_vulnerability(&self, table: &DamageTable) -> Vec<RegionalVulnerability> {
        let groups = group_by_country(table);
        let max = groups.iter().map(|g| g.total_damage).fold(0.0_f64, f64::max);
        groups
            .into_iter()
            .map(|g| RegionalVulnerability {
                vulnerability_score: (max > 0.0).then(|| g.total_damage / max * 100.0),
                total_damage: g.total_damage,
                avg_damage: g.avg_damage,
                event_count: g.incident_count,
                country: g.country,
            })
            .collect()
    }

    pub fn project_risk(&self, table: &DamageTable, projection_years: u32) -> RiskProjection {
        RiskProjection {
            projection_period: projection_years,
            risk_trend: "increasing".to_string(),
            confidence_level: "medium".to_string(),
            key_risks: vec![
                "Increased frequency of extreme weather events".to_string(),
                "Rising temperatures".to_string(),
                "Changes in precipitation patterns".to_string(),
            ],
            avg_annual_increase_pct: avg_annual_increase(table),
        }
    }
}

/// Mean year-over-year percentage change of yearly damage sums. Steps from
/// a zero year are skipped.
fn avg_annual_increase(table: &DamageTable) -> Option<f64> {
    if !table.columns.year || !table.columns.damage_cost {
        return None;
    }
    let mut yearly: BTreeMap<i32, f64> = BTreeMap::new();
    for r in &table.records {
        if let (Some(y), Some(d)) = (r.year, r.damage_cost) {
            *yearly.entry(y).or_insert(0.0) += d;
        }
    }
    let sums: Vec<f64> = yearly.into_values().collect();
    let changes: Vec<f64> = sums
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect();
    if changes.is_empty() {
        None
    } else {
        Some(average(&changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Columns, DamageRecord};

    fn rec(country: &str, year: i32, damage: f64) -> DamageRecord {
        DamageRecord {
            country: Some(country.to_string()),
            year: Some(year),
            damage_cost: Some(damage),
            ..Default::default()
        }
    }

    #[test]
    fn test_extreme_events_above_percentile() {
        let records: Vec<DamageRecord> = (1..=20).map(|i| rec("A", 2000 + i, i as f64)).collect();
        let t = DamageTable::new(Columns::all(), records);
        let events = HazardAnalyzer.detect_extreme_events(&t, DEFAULT_EXTREME_PERCENTILE);
        // 95th percentile of 1..=20 is 19.05.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].damage_cost, 20.0);
        assert_eq!(events[0].year, Some(2020));
    }

    #[test]
    fn test_extreme_events_empty_table() {
        let t = DamageTable::new(Columns::all(), Vec::new());
        assert!(HazardAnalyzer.detect_extreme_events(&t, 95.0).is_empty());
    }

    #[test]
    fn test_regional_vulnerability_scores() {
        let t = DamageTable::new(
            Columns::all(),
            vec![rec("A", 2020, 50.0), rec("B", 2020, 200.0), rec("A", 2021, 50.0)],
        );
        let v = HazardAnalyzer.regional_vulnerability(&t);
        assert_eq!(v[0].country, "A");
        assert_eq!(v[0].vulnerability_score, Some(50.0));
        assert_eq!(v[0].event_count, 2);
        assert_eq!(v[1].vulnerability_score, Some(100.0));
    }

    #[test]
    fn test_regional_vulnerability_zero_max() {
        let t = DamageTable::new(Columns::all(), vec![rec("A", 2020, 0.0)]);
        assert_eq!(HazardAnalyzer.regional_vulnerability(&t)[0].vulnerability_score, None);
    }

    #[test]
    fn test_projection_trend() {
        let t = DamageTable::new(
            Columns::all(),
            vec![rec("A", 2021, 100.0), rec("B", 2020, 100.0), rec("A", 2022, 300.0), rec("B", 2021, 100.0)],
        );
        // 2020: 100, 2021: 200, 2022: 300 -> +100%, +50%
        let p = HazardAnalyzer.project_risk(&t, 10);
        assert_eq!(p.projection_period, 10);
        assert!((p.avg_annual_increase_pct.unwrap() - 75.0).abs() < 1e-9);

        let single = DamageTable::new(Columns::all(), vec![rec("A", 2020, 1.0)]);
        assert_eq!(HazardAnalyzer.project_risk(&single, 5).avg_annual_increase_pct, None);
    }
}
