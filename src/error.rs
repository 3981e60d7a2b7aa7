use thiserror::Error;

/// Errors surfaced by the loader, configuration and export layers.
///
/// The computational stages never fail: missing columns, empty tables and
/// zero denominators degrade to zeroed or absent values instead.
#[derive(Debug, Error)]
pub enum CouncilError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value in column '{column}' at row {row}: {value:?}")]
    Validation {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Negative damage_cost at row {row}: {value}")]
    NegativeDamage { row: usize, value: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CouncilError>;
