use crate::error::{CouncilError, Result};
use crate::types::{Columns, DamageRecord, DamageTable};
use crate::util::{is_missing, parse_f64_safe, parse_i32_safe, parse_text_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub missing_damage: usize,
    pub distinct_countries: usize,
}

/// Header positions, matched case-insensitively after trimming.
#[derive(Debug, Default)]
struct ColumnIndex {
    country: Option<usize>,
    year: Option<usize>,
    damage_cost: Option<usize>,
    co2_emissions: Option<usize>,
    gdp: Option<usize>,
    event_type: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut idx = ColumnIndex::default();
        for (i, h) in headers.iter().enumerate() {
            let slot = match h.trim().to_ascii_lowercase().as_str() {
                "country" => &mut idx.country,
                "year" => &mut idx.year,
                "damage_cost" => &mut idx.damage_cost,
                "co2_emissions" => &mut idx.co2_emissions,
                "gdp" => &mut idx.gdp,
                "event_type" => &mut idx.event_type,
                _ => continue,
            };
            // First occurrence wins on duplicate headers.
            if slot.is_none() {
                *slot = Some(i);
            }
        }
        idx
    }

    fn columns(&self) -> Columns {
        Columns {
            country: self.country.is_some(),
            year: self.year.is_some(),
            damage_cost: self.damage_cost.is_some(),
            co2_emissions: self.co2_emissions.is_some(),
            gdp: self.gdp.is_some(),
            event_type: self.event_type.is_some(),
        }
    }
}

fn cell<'a>(row: &'a StringRecord, pos: Option<usize>) -> Option<&'a str> {
    pos.and_then(|i| row.get(i))
}

/// Parse a numeric cell. Blank cells and markers such as `NaN` or `N/A` are
/// `None`; anything else that fails to parse is a validation error naming
/// the column.
fn numeric(row: &StringRecord, pos: Option<usize>, column: &str, line: usize) -> Result<Option<f64>> {
    let raw = cell(row, pos);
    if is_missing(raw) {
        return Ok(None);
    }
    match parse_f64_safe(raw) {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(CouncilError::Validation {
            column: column.to_string(),
            row: line,
            value: raw.unwrap_or_default().to_string(),
        }),
    }
}

fn year(row: &StringRecord, pos: Option<usize>, line: usize) -> Result<Option<i32>> {
    let raw = cell(row, pos);
    if is_missing(raw) {
        return Ok(None);
    }
    parse_i32_safe(raw).map(Some).ok_or_else(|| CouncilError::Validation {
        column: "year".to_string(),
        row: line,
        value: raw.unwrap_or_default().to_string(),
    })
}

/// Load a damage table from a CSV file on disk.
pub fn load_table(path: impl AsRef<Path>) -> Result<(DamageTable, LoadReport)> {
    let file = File::open(path.as_ref())?;
    read_table(file)
}

/// Read a damage table from any CSV source. Rows are numbered from 1,
/// excluding the header line.
pub fn read_table<R: Read>(source: R) -> Result<(DamageTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);
    let index = ColumnIndex::from_headers(rdr.headers()?);
    let columns = index.columns();
    tracing::debug!(?columns, "Resolved table columns");

    let mut records = Vec::new();
    let mut missing_damage = 0usize;
    let mut countries: HashSet<String> = HashSet::new();

    for (i, result) in rdr.records().enumerate() {
        let line = i + 1;
        let row = result?;

        let damage_cost = numeric(&row, index.damage_cost, "damage_cost", line)?;
        if let Some(v) = damage_cost {
            if v < 0.0 {
                return Err(CouncilError::NegativeDamage { row: line, value: v });
            }
        } else if columns.damage_cost {
            missing_damage += 1;
        }

        let country = parse_text_safe(cell(&row, index.country));
        if let Some(c) = &country {
            countries.insert(c.clone());
        }

        records.push(DamageRecord {
            country,
            year: year(&row, index.year, line)?,
            damage_cost,
            co2_emissions: numeric(&row, index.co2_emissions, "co2_emissions", line)?,
            gdp: numeric(&row, index.gdp, "gdp", line)?,
            event_type: parse_text_safe(cell(&row, index.event_type)),
        });
    }

    let report = LoadReport {
        total_rows: records.len(),
        missing_damage,
        distinct_countries: countries.len(),
    };
    tracing::info!(
        rows = report.total_rows,
        countries = report.distinct_countries,
        "Loaded damage table"
    );
    Ok((DamageTable::new(columns, records), report))
}
