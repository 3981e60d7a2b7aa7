//! Pipeline configuration.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables for the model client (`PHOENIX_MODEL_*`)
//! 3. YAML config file passed with `--config`
//! 4. Defaults
//!
//! The resolved value is passed into [`crate::council::Council::new`] and
//! never read from ambient state afterwards.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{CouncilError, Result};

pub const ENV_MODEL: &str = "PHOENIX_MODEL";
pub const ENV_BASE_URL: &str = "PHOENIX_MODEL_BASE_URL";
pub const ENV_API_KEY: &str = "PHOENIX_MODEL_API_KEY";
pub const ENV_API_VERSION: &str = "PHOENIX_MODEL_API_VERSION";
pub const ENV_TIMEOUT: &str = "PHOENIX_MODEL_TIMEOUT";

/// Which aggregate drives the categorical risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RiskBasis {
    /// Thresholds 1e9 / 5e9 on the summed damages.
    #[default]
    #[value(name = "total")]
    TotalDamages,
    /// Thresholds 1e8 / 5e8 on the mean damage per row.
    #[value(name = "average")]
    AverageDamages,
}

/// Which catalog feeds the report's policy recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCatalog {
    /// Four ranked policies budgeted from total damages.
    #[default]
    Composer,
    /// Two policies budgeted from the synthesized investment total.
    Synthesis,
}

/// Settings for an external language-model collaborator. Nothing in the
/// crate calls a model; this is carried so a [`crate::council::Narrator`]
/// implementation can be configured from the same file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelClientConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    /// Provider API version, or `"ollama"` for a local server.
    pub api_version: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for ModelClientConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: String::new(),
            api_key: String::new(),
            api_version: "2024-02-15-preview".to_string(),
            temperature: 0.7,
            timeout_secs: 300,
        }
    }
}

impl ModelClientConfig {
    /// Overlay values from a variable lookup onto `self`.
    ///
    /// Taking the lookup as a closure keeps tests independent of the
    /// process environment.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = lookup(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = lookup(ENV_API_VERSION) {
            self.api_version = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = v.trim().parse().map_err(|_| {
                CouncilError::Config(format!("{} must be a whole number of seconds, got {:?}", ENV_TIMEOUT, v))
            })?;
        }
        Ok(self)
    }

    pub fn is_ollama(&self) -> bool {
        self.api_version.eq_ignore_ascii_case("ollama")
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CouncilError::Config("model base_url is not set".to_string()));
        }
        if !self.is_ollama() && self.api_key.trim().is_empty() {
            return Err(CouncilError::Config("model api_key is not set".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CouncilError::Config(format!(
                "model temperature must be within 0..=2, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilConfig {
    pub risk_basis: RiskBasis,
    /// Number of countries kept in `high_risk_countries`.
    pub top_n: usize,
    pub policy_catalog: PolicyCatalog,
    /// Run the simulation stage for every scenario.
    pub simulate: bool,
    /// Attach feasibility and roadmap records to composed policies.
    pub implementation_plans: bool,
    pub model: ModelClientConfig,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            risk_basis: RiskBasis::default(),
            top_n: 5,
            policy_catalog: PolicyCatalog::default(),
            simulate: false,
            implementation_plans: false,
            model: ModelClientConfig::default(),
        }
    }
}

impl CouncilConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CouncilConfig::default();
        assert_eq!(config.risk_basis, RiskBasis::TotalDamages);
        assert_eq!(config.policy_catalog, PolicyCatalog::Composer);
        assert_eq!(config.top_n, 5);
        assert!(!config.simulate);
        assert_eq!(config.model.timeout_secs, 300);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "risk_basis: average_damages\ntop_n: 3\nmodel:\n  api_version: ollama\n";
        let config = CouncilConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.risk_basis, RiskBasis::AverageDamages);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.policy_catalog, PolicyCatalog::Composer);
        assert!(config.model.is_ollama());
        assert_eq!(config.model.model, "gpt-4");
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            (ENV_MODEL, "llama3"),
            (ENV_BASE_URL, "http://localhost:11434"),
            (ENV_API_VERSION, "ollama"),
            (ENV_TIMEOUT, "60"),
        ]
        .into_iter()
        .collect();
        let model = ModelClientConfig::default()
            .with_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(model.model, "llama3");
        assert_eq!(model.timeout_secs, 60);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_bad_timeout_env() {
        let result = ModelClientConfig::default().with_env(|k| {
            (k == ENV_TIMEOUT).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(CouncilError::Config(_))));
    }

    #[test]
    fn test_validation_requires_key_unless_ollama() {
        let mut model = ModelClientConfig {
            base_url: "https://example.openai.azure.com".to_string(),
            ..Default::default()
        };
        assert!(model.validate().is_err());

        model.api_key = "secret".to_string();
        assert!(model.validate().is_ok());

        model.temperature = 3.5;
        assert!(model.validate().is_err());

        let empty = ModelClientConfig::default();
        assert!(empty.validate().is_err());
    }
}
