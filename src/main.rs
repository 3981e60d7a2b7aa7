// Entry point and CLI flow.
//
// - `analyze` runs the full council pipeline once and optionally exports it.
// - `insights` prints the economic and hazard analyses as JSON.
// - `interactive` is the menu loop: [1] loads the CSV, [2] generates the
//   reports, then the user can go back to the menu or exit.
// - `config` shows the resolved configuration.
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use phoenix_council::economics::{EconomicAnalyzer, RecoveryModeler, DEFAULT_RECOVERY_MULTIPLIER};
use phoenix_council::hazards::{HazardAnalyzer, DEFAULT_EXTREME_PERCENTILE};
use phoenix_council::loader::{self, LoadReport};
use phoenix_council::output::{self, ReportEnvelope};
use phoenix_council::synthesis::format_executive_summary;
use phoenix_council::util::format_int;
use phoenix_council::{
    Council, CouncilConfig, DamageTable, Narrator, PolicyCatalog, RiskBasis, SilentNarrator,
    TemplateNarrator,
};

/// phoenix - climate damage risk, recovery and policy council
#[derive(Parser, Debug)]
#[command(name = "phoenix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline on a CSV file
    Analyze {
        /// Damage records (country, year, damage_cost, co2_emissions, gdp, event_type)
        csv: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Directory for council_report.json, high_risk_countries.csv and policies.csv
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Rows shown per preview table
        #[arg(long, default_value = "5")]
        preview_rows: usize,
    },

    /// Economic impact, sector and hazard analyses
    Insights {
        csv: PathBuf,

        /// Percentile above which a record counts as extreme
        #[arg(long, default_value_t = DEFAULT_EXTREME_PERCENTILE)]
        percentile: f64,

        /// Multiplier applied to total damages for investment sizing
        #[arg(long, default_value_t = DEFAULT_RECOVERY_MULTIPLIER)]
        multiplier: f64,

        /// Horizon of the damage trend projection
        #[arg(long, default_value = "10")]
        projection_years: u32,
    },

    /// Menu-driven session: load once, generate reports repeatedly
    Interactive {
        /// CSV file loaded by option [1]
        #[arg(default_value = "climate_damages.csv")]
        csv: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Directory the reports are written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Print the resolved configuration
    Config {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    /// YAML configuration file
    #[arg(long, env = "PHOENIX_CONFIG")]
    config: Option<PathBuf>,

    /// Number of high-risk countries to keep
    #[arg(long)]
    top_n: Option<usize>,

    /// Aggregate used for the risk tier
    #[arg(long, value_enum)]
    risk_basis: Option<RiskBasis>,

    /// Policy catalog used in the report
    #[arg(long, value_enum)]
    policy_catalog: Option<PolicyCatalog>,

    /// Simulate best/expected/worst outcomes for every scenario
    #[arg(long)]
    simulate: bool,

    /// Attach feasibility and roadmap plans to each policy
    #[arg(long)]
    plans: bool,

    /// Attach the executive summary narrative to the exported report
    #[arg(long)]
    narrate: bool,
}

impl PipelineArgs {
    fn resolve(&self) -> Result<CouncilConfig> {
        self.resolve_with(|k| std::env::var(k).ok())
    }

    /// Defaults, then the YAML file, then `PHOENIX_MODEL_*` through `lookup`,
    /// then flags.
    fn resolve_with<F>(&self, lookup: F) -> Result<CouncilConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => CouncilConfig::from_file(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?,
            None => CouncilConfig::default(),
        };
        config.model = config
            .model
            .with_env(lookup)
            .context("Invalid model settings in environment")?;

        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(basis) = self.risk_basis {
            config.risk_basis = basis;
        }
        if let Some(catalog) = self.policy_catalog {
            config.policy_catalog = catalog;
        }
        config.simulate |= self.simulate;
        config.implementation_plans |= self.plans;
        Ok(config)
    }

    fn narrator(&self) -> &'static dyn Narrator {
        if self.narrate {
            &TemplateNarrator
        } else {
            &SilentNarrator
        }
    }
}

fn load(path: &Path) -> Result<(DamageTable, LoadReport)> {
    loader::load_table(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows loaded, {} countries)",
        format_int(report.total_rows),
        format_int(report.distinct_countries)
    );
    if report.missing_damage > 0 {
        println!(
            "Note: {} rows have no damage_cost and are skipped in aggregates.",
            format_int(report.missing_damage)
        );
    }
    println!();
}

/// Run the council, print previews and optionally export files into `out`.
fn generate_reports(
    council: &Council,
    narrator: &dyn Narrator,
    table: &DamageTable,
    source: &Path,
    out: Option<&Path>,
    preview_rows: usize,
) -> Result<()> {
    println!("Generating reports...\n");
    let narrated = council.run_with_narrator(table, narrator);
    let report = &narrated.report;

    output::preview_report(report, preview_rows);
    println!("{}", format_executive_summary(report));

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let envelope = ReportEnvelope::new(
            source.display().to_string(),
            report,
            narrated.narrative.as_deref(),
        );
        let json_path = dir.join("council_report.json");
        output::write_json(&json_path, &envelope)?;

        let countries_path = dir.join("high_risk_countries.csv");
        output::write_csv(
            &countries_path,
            &output::country_rows(&report.risk_analysis.high_risk_countries),
        )?;

        let policies_path = dir.join("policies.csv");
        output::write_csv(&policies_path, &output::policy_rows(&report.policy_recommendations))?;

        println!("Outputs saved to {}", dir.display());
    }
    Ok(())
}

fn run_insights(csv: &Path, percentile: f64, multiplier: f64, projection_years: u32) -> Result<()> {
    let (table, _) = load(csv)?;

    let economics = EconomicAnalyzer;
    let hazards = HazardAnalyzer;
    let impact = economics.economic_impact(&table);
    let recovery = RecoveryModeler.model_economic_recovery("All regions", impact.total_economic_loss);
    let needs = economics.investment_needs(&table, multiplier);
    let cost_benefit = economics.cost_benefit(needs.total_investment_required, impact.total_economic_loss);
    let timeline = economics.recovery_timeline(impact.total_economic_loss, "All regions");

    let insights = json!({
        "economic_impact": impact,
        "investment_needs": needs,
        "cost_benefit": cost_benefit,
        "recovery_timeline": timeline,
        "recovery_model": recovery,
        "sector_vulnerability": economics.sector_vulnerability(&table),
        "extreme_events": hazards.detect_extreme_events(&table, percentile),
        "regional_vulnerability": hazards.regional_vulnerability(&table),
        "risk_projection": hazards.project_risk(&table, projection_years),
    });
    println!("{}", serde_json::to_string_pretty(&insights)?);
    Ok(())
}

fn show_config(pipeline: &PipelineArgs) -> Result<()> {
    let mut config = pipeline.resolve()?;
    let validation = config.model.validate();
    if !config.model.api_key.is_empty() {
        config.model.api_key = "********".to_string();
    }
    println!("{}", serde_yaml::to_string(&config)?);
    match validation {
        Ok(()) => println!("Model client: configured ({})", config.model.model),
        Err(e) => println!("Model client: not configured ({})", e),
    }
    Ok(())
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// State for one interactive run; the table is loaded once and reused.
struct Session {
    csv: PathBuf,
    out: PathBuf,
    council: Council,
    narrator: &'static dyn Narrator,
    data: Option<DamageTable>,
}

impl Session {
    fn handle_load(&mut self) {
        match load(&self.csv) {
            Ok((table, report)) => {
                print_load_report(&report);
                self.data = Some(table);
            }
            Err(e) => eprintln!("Failed to load file: {:#}\n", e),
        }
    }

    fn handle_generate_reports(&self) {
        let Some(table) = &self.data else {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            return;
        };
        if let Err(e) = generate_reports(
            &self.council,
            self.narrator,
            table,
            &self.csv,
            Some(&self.out),
            5,
        ) {
            eprintln!("Write error: {:#}", e);
        }
    }

    fn run(mut self) {
        loop {
            println!("Select an option:");
            println!("[1] Load the file");
            println!("[2] Generate Reports\n");
            let Some(choice) = read_choice() else {
                break;
            };
            match choice.as_str() {
                "1" => self.handle_load(),
                "2" => {
                    println!();
                    self.handle_generate_reports();
                    if !prompt_back_to_menu() {
                        println!("Exiting the program.");
                        break;
                    }
                }
                _ => println!("Invalid choice. Please enter 1 or 2.\n"),
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            csv,
            pipeline,
            out,
            preview_rows,
        } => {
            let council = Council::new(pipeline.resolve()?);
            let (table, load_report) = load(&csv)?;
            print_load_report(&load_report);
            generate_reports(
                &council,
                pipeline.narrator(),
                &table,
                &csv,
                out.as_deref(),
                preview_rows,
            )?;
        }
        Commands::Insights {
            csv,
            percentile,
            multiplier,
            projection_years,
        } => run_insights(&csv, percentile, multiplier, projection_years)?,
        Commands::Interactive { csv, pipeline, out } => {
            let session = Session {
                council: Council::new(pipeline.resolve()?),
                narrator: pipeline.narrator(),
                csv,
                out,
                data: None,
            };
            session.run();
        }
        Commands::Config { pipeline } => show_config(&pipeline)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "phoenix",
            "analyze",
            "data.csv",
            "--top-n",
            "3",
            "--risk-basis",
            "average",
            "--policy-catalog",
            "synthesis",
            "--simulate",
        ]);
        let Commands::Analyze { mut pipeline, .. } = cli.command else {
            panic!("expected analyze");
        };
        // Keep a PHOENIX_CONFIG set in the outer environment out of the test.
        pipeline.config = None;
        let config = pipeline.resolve_with(|_| None).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.risk_basis, RiskBasis::AverageDamages);
        assert_eq!(config.policy_catalog, PolicyCatalog::Synthesis);
        assert!(config.simulate);
        assert!(!config.implementation_plans);
    }

    #[test]
    fn test_model_env_goes_through_lookup() {
        let cli = Cli::parse_from(["phoenix", "config"]);
        let Commands::Config { mut pipeline } = cli.command else {
            panic!("expected config");
        };
        pipeline.config = None;

        let config = pipeline
            .resolve_with(|k| match k {
                "PHOENIX_MODEL" => Some("llama3".to_string()),
                "PHOENIX_MODEL_TIMEOUT" => Some("60".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.model.model, "llama3");
        assert_eq!(config.model.timeout_secs, 60);

        let bad = pipeline.resolve_with(|k| (k == "PHOENIX_MODEL_TIMEOUT").then(|| "soon".to_string()));
        assert!(bad.is_err());
    }
}
