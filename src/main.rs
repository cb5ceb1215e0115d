//! titanic-eda - exploratory data analysis of the Titanic passenger dataset
//!
//! Loads the passenger table, fills and drops missing values, prints summary
//! tables, renders five PNG charts and reports the key findings.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (load failure, empty table, missing category, drawing)

mod analysis;
mod charts;
mod cleaning;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use analysis::Analysis;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("titanic-eda v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(&args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .titanic-eda.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the dataset source, chart directory and report policy.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the whole pipeline: load, explore, clean, aggregate, chart, report.
fn run_analysis(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);

    // Step 1: Load
    let source = config.dataset.source();
    println!("📥 Loading dataset: {}", source.describe());

    let mut table = match dataset::load_dataset(&source, !args.quiet) {
        Ok(table) => {
            println!("Dataset loaded successfully!");
            table
        }
        Err(e) => {
            println!("Error loading dataset: {}", e);
            return Err(e).context("Failed to load dataset");
        }
    };

    println!("\nFirst 5 rows of the dataset:");
    println!("{}", report::format_head(&table, 5));
    println!("Dataset Information:");
    println!("{}", report::format_info(&table));
    println!("Missing values in each column:");
    println!("{}", report::format_null_counts(&table));

    // Step 2: Clean
    info!("{} missing values before cleaning", models::total_nulls(&table));
    println!("🧹 Cleaning data...");
    let summary = cleaning::clean(&mut table).context("Failed to clean dataset")?;
    println!("{}", report::format_cleaning(&summary));
    println!("\nMissing values after cleaning:");
    println!("{}", report::format_null_counts(&table));

    // Step 3: Aggregate
    let analysis = Analysis::compute(&table).context("Failed to aggregate dataset")?;

    println!("Summary Statistics:");
    println!("{}", report::format_describe(&analysis.summary));
    println!("Average values by passenger class:");
    println!("{}", report::format_grouped(&analysis.by_class));
    println!("Average values by sex:");
    println!("{}", report::format_grouped(&analysis.by_sex));
    println!("Average values by embarkation town:");
    println!("{}", report::format_grouped(&analysis.by_embark_town));

    // Step 4: Charts
    let output_dir = config.output_dir();
    println!("📊 Rendering charts to {}", output_dir.display());
    let written = charts::render_all(&table, &output_dir).context("Failed to render charts")?;
    for path in &written {
        println!("   🖼️  {}", path.display());
    }

    // Step 5: Report
    let insights = report::key_insights(&analysis, config.report.on_missing_category)
        .context("Failed to build key insights")?;

    println!("\nKey Insights from the Analysis:");
    println!("{}", report::format_insights(&insights));

    let duration = start_time.elapsed().as_secs_f64();
    println!("\n✅ Analysis complete in {:.1}s", duration);

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
