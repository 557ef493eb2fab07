use anyhow::{Context, Result};
use catalog_exclude::utils::{default_config_path, DEFAULT_EXTENSION};
use catalog_exclude::{
    apply_update, build_update_plan, read_config, reconcile_corpus, render_summary,
    NetcdfInventory, SummaryContext,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Catalog exclude - reconcile the catalog variable exclusion list with a data corpus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directories to scan
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Project whose configuration section is reconciled
    #[arg(short, long, env = "CATALOG_EXCLUDE_PROJECT")]
    project: String,

    /// Configuration file (default: ~/.catalog-exclude/config.json)
    #[arg(short, long, env = "CATALOG_EXCLUDE_CONFIG")]
    config: Option<PathBuf>,

    /// Extension of the files whose variables are listed
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Write the update to the configuration file instead of only printing it
    #[arg(short, long)]
    write: bool,

    /// Log every file
    #[arg(short, long)]
    verbose: bool,
}

/// RUST_LOG wins over --verbose
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose).as_str().to_lowercase()))
}

fn default_log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(args.verbose))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()
            .context("Cannot determine the home directory, pass --config")?,
    };

    let config = read_config(&config_path)
        .await
        .with_context(|| format!("Cannot read {}", config_path.display()))?;
    if config.is_none() {
        warn!("{} does not exist, starting from an empty configuration", config_path.display());
    }
    let section = config.unwrap_or_default().project(&args.project);
    let initial_excludes = section.excluded_variables();

    info!(
        "Project '{}': {} variables currently excluded",
        args.project,
        initial_excludes.len()
    );

    let inventory = NetcdfInventory::new();
    let reconciliation = reconcile_corpus(&args.roots, &args.extension, &inventory, initial_excludes)?;

    let plan = build_update_plan(&args.project, &reconciliation.outcome, &section.variable_locate);
    let status = apply_update(&config_path, &plan, args.write).await;

    let context = SummaryContext::new(&args.project, &reconciliation, &plan, &status);
    print!("{}", render_summary(&context)?);

    Ok(())
}
