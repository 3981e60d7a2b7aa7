//! phoenix_council - climate damage risk and recovery pipeline
//!
//! Turns a table of climate damage records into risk statistics, recovery
//! scenarios, ranked policy budgets and an executive summary.
//!
//! # Modules
//!
//! - `loader`: CSV to [`DamageTable`]
//! - `risk`, `scenarios`, `simulation`, `policy`, `synthesis`: pipeline stages
//! - `council`: runs the stages in order from a [`CouncilConfig`]
//! - `economics`, `hazards`: standalone analyses over the same table
//! - `output`: JSON/CSV export and Markdown previews
//!
//! # Usage
//!
//! ```bash
//! phoenix analyze damages.csv --simulate --out reports/
//! phoenix insights damages.csv --percentile 90
//! ```

pub mod config;
pub mod council;
pub mod economics;
pub mod error;
pub mod hazards;
pub mod loader;
pub mod output;
pub mod policy;
pub mod risk;
pub mod scenarios;
pub mod simulation;
pub mod synthesis;
pub mod types;
pub mod util;

pub use config::{CouncilConfig, ModelClientConfig, PolicyCatalog, RiskBasis};
pub use council::{Council, NarratedReport, Narrator, SilentNarrator, TemplateNarrator};
pub use error::{CouncilError, Result};
pub use types::{CouncilReport, DamageRecord, DamageTable, RiskAssessment, RiskLevel};
