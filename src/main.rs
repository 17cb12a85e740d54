use anyhow::{Context, Result};
use bwalloc::config::ConfigManager;
use bwalloc::data::CsvConnector;
use bwalloc::engines::generation::LogProgressCallback;
use bwalloc::engines::ComparisonRunner;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bwalloc")]
#[command(about = "Compare evolved and forecast-driven bandwidth allocation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize, forecast and report metrics for both strategies
    Run {
        /// CSV with the aggregate traffic series
        #[arg(long)]
        traffic: PathBuf,
        /// CSV with one usage column per cell
        #[arg(long)]
        usage: PathBuf,
        /// TOML config; BWALLOC__* environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    DefaultConfig {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let manager = ConfigManager::new();

    match cli.command {
        Commands::Run {
            traffic,
            usage,
            config,
            output,
        } => {
            manager
                .load_layered(config.as_ref())
                .context("loading configuration")?;
            let app_config = manager.get();

            let (traffic, usage, _metadata) = CsvConnector::load_dataset(&traffic, &usage)
                .context("loading traffic and usage data")?;

            let generations = app_config.optimizer.num_generations;
            let runner = ComparisonRunner::new(app_config)?;
            let report = runner
                .run(&traffic, &usage, LogProgressCallback::new(generations))
                .context("running comparison")?;

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing report to {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Commands::DefaultConfig { output } => match output {
            Some(path) => manager
                .save_to_file(&path)
                .with_context(|| format!("writing config to {}", path.display()))?,
            None => println!("{}", manager.to_toml()?),
        },
    }

    Ok(())
}
