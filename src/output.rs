use crate::error::Result;
use crate::types::{
    CountryRisk, CountryRiskRow, CouncilReport, PolicyRecommendation, PolicyRow, RecoveryScenario,
    ScenarioRow,
};
use crate::util::{format_int, format_number};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Exported JSON wrapper. The timestamp lives here so the report itself
/// stays a pure function of the input table.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<&'a str>,
    pub report: &'a CouncilReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(source: impl Into<String>, report: &'a CouncilReport, narrative: Option<&'a str>) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.into(),
            narrative,
            report,
        }
    }
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn country_rows(countries: &[CountryRisk]) -> Vec<CountryRiskRow> {
    countries
        .iter()
        .enumerate()
        .map(|(idx, c)| CountryRiskRow {
            rank: idx + 1,
            country: c.country.clone(),
            total_damage: format_number(c.total_damage, 2),
            avg_damage: format_number(c.avg_damage, 2),
            incident_count: c.incident_count,
        })
        .collect()
}

pub fn scenario_rows(scenarios: &[RecoveryScenario]) -> Vec<ScenarioRow> {
    scenarios
        .iter()
        .map(|s| ScenarioRow {
            scenario_name: s.scenario_name.clone(),
            timeframe: s.timeframe.clone(),
            estimated_cost: format_number(s.estimated_cost, 2),
            actions: s.key_actions.len(),
        })
        .collect()
}

pub fn policy_rows(policies: &[PolicyRecommendation]) -> Vec<PolicyRow> {
    policies
        .iter()
        .map(|p| PolicyRow {
            rank: p.rank.map(format_int).unwrap_or_else(|| "-".to_string()),
            policy_id: p.policy_id.clone(),
            title: p.title.clone(),
            priority: p.priority.to_string(),
            budget: format_number(p.estimated_budget, 2),
            urgency: p.urgency_score.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

/// Print the Markdown previews for every section of a report.
pub fn preview_report(report: &CouncilReport, max_rows: usize) {
    println!("High-Risk Countries");
    println!("(Top {} by TotalDamage)\n", report.risk_analysis.high_risk_countries.len());
    preview_table_rows(&country_rows(&report.risk_analysis.high_risk_countries), max_rows);

    println!("Recovery Scenarios\n");
    preview_table_rows(&scenario_rows(&report.recovery_scenarios), max_rows);

    println!("Policy Recommendations\n");
    preview_table_rows(&policy_rows(&report.policy_recommendations), max_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::Council;
    use crate::types::{Columns, DamageRecord, DamageTable};

    fn report() -> CouncilReport {
        let row = |c: &str, d: f64| DamageRecord {
            country: Some(c.to_string()),
            damage_cost: Some(d),
            ..Default::default()
        };
        let table = DamageTable::new(Columns::all(), vec![row("A", 1_000_000.0), row("B", 2_000_000.0)]);
        Council::default().run(&table)
    }

    #[test]
    fn test_rows_are_formatted() {
        let r = report();
        let countries = country_rows(&r.risk_analysis.high_risk_countries);
        assert_eq!(countries[0].country, "B");
        assert_eq!(countries[0].total_damage, "2,000,000.00");
        assert_eq!(countries[1].rank, 2);

        let policies = policy_rows(&r.policy_recommendations);
        assert_eq!(policies[0].rank, "1");
        assert_eq!(policies[0].urgency, "75");
    }

    #[test]
    fn test_render_table_markdown() {
        let r = report();
        let text = render_table(&scenario_rows(&r.recovery_scenarios), 2);
        assert!(text.contains("| Scenario"));
        assert!(text.contains("Immediate Emergency Response"));
        assert!(!text.contains("Long-term Climate Resilience"));
        assert_eq!(render_table::<ScenarioRow>(&[], 2), "(no rows)");
    }

    #[test]
    fn test_envelope_json_and_csv_files() {
        let r = report();
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("report.json");
        write_json(&json_path, &ReportEnvelope::new("sample.csv", &r, None)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["source"], "sample.csv");
        assert_eq!(value["report"]["summary"]["risk_level"], "MEDIUM");
        assert!(value.get("narrative").is_none());

        let csv_path = dir.path().join("policies.csv");
        write_csv(&csv_path, &policy_rows(&r.policy_recommendations)).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("Rank,PolicyId,Title,Priority,Budget,Urgency"));
        assert_eq!(text.lines().count(), 5);
    }
}
