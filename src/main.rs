//! gearsheet - parse a character profile, enrich its gear and write a report.
//!
//! # Execution Flow
//!
//! 1. Load settings from `<config-dir>/settings.yaml` (+ `GEARSHEET_*` env vars)
//! 2. Initialize logging → `<log_dir>/gearsheet.<date>`, warnings also on stderr
//! 3. Load the static data table from `<config-dir>/game_data.yaml`
//! 4. Parse the profile into a character with unenriched items
//! 5. Enrich every item concurrently from the item API
//! 6. Build the report and write it as JSON to `--output` or stdout
//!
//! Any fatal error (unreadable profile, bad `level=`, unreachable item API,
//! missing data table) exits non-zero before anything is written.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use gearsheet::{
    APP_NAME, ConfigManager, Enricher, GearReport, HttpItemSource, Metrics, ProfileParser, VERSION,
};
use std::fs;
use std::io::Write;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gearsheet", version, about = "Parse a gear profile and enrich it from the item API")]
struct Cli {
    /// Profile export to read
    profile: Utf8PathBuf,

    /// Directory containing game_data.yaml and settings.yaml
    #[arg(long, default_value = "data")]
    config_dir: Utf8PathBuf,

    /// Write the JSON report here instead of stdout
    #[arg(long, short)]
    output: Option<Utf8PathBuf>,

    /// Log at debug level and mirror all logs to stderr (warnings always go there)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir);
    let settings = config_manager.load_settings()?;
    let debug_mode = cli.debug || settings.debug_mode;

    let _guard = gearsheet::logging::setup_logging_with_console(
        Utf8PathBuf::from(&settings.log_dir).as_path(),
        APP_NAME,
        debug_mode,
        debug_mode,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    config_manager.log_settings(&settings);

    // Loaded once, read-only from here on
    let game_data = Arc::new(config_manager.load_game_data()?);
    let metrics = Arc::new(Metrics::new());

    let parser = ProfileParser::new(&game_data)?.with_metrics(metrics.clone());
    let mut character = parser.parse_file(&cli.profile)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gearsheet-worker")
        .build()?;

    let source = Arc::new(
        HttpItemSource::new(&settings).context("Failed to build item API client")?,
    );
    let enricher = Enricher::new(source, settings.locale.clone()).with_metrics(metrics.clone());

    let summary = runtime
        .block_on(enricher.enrich_character(&mut character))
        .context("Enrichment failed, no report written")?;

    tracing::info!(
        "Enriched {}/{} items for {} ({} {})",
        summary.enriched,
        summary.requested,
        character.name,
        character.spec,
        character.class
    );

    let report = GearReport::build(&character, &game_data, &settings.locale);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write report: {}", path))?;
            tracing::info!("Report written to {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write report to stdout")?;
        }
    }

    metrics.log_summary();
    Ok(())
}
