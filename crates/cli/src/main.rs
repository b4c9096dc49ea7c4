//! Model Exploration & Prediction Workbench CLI
//!
//! A command-line front end for browsing prediction models, inspecting
//! their training metrics, generating sample inputs and requesting
//! predictions from the backend.

mod commands;
mod config;
mod output;
mod session;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{catalog, predict, settings, training};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use workbench_lib::{WorkbenchConfig, WorkbenchMetrics};

/// Model Exploration & Prediction Workbench CLI
#[derive(Parser)]
#[command(name = "mwb")]
#[command(author, version, about = "CLI for the Model Exploration & Prediction Workbench", long_about = None)]
pub struct Cli {
    /// Backend base URL (can also be set via WORKBENCH_API_URL env var)
    #[arg(long, global = true, env = "WORKBENCH_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "WORKBENCH_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format (defaults to the config file setting, then table)
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print collected Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    pub dump_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available models
    Models,

    /// Show the input schema of a model
    Schema {
        /// Model id or name
        model: String,
    },

    /// Show training metrics for a model
    Metrics {
        /// Model id or name
        model: String,

        /// Variant to show (all, best, random-forest, xgboost, neural-network, logistic-regression)
        #[arg(long, short, default_value = "best", value_parser = training::parse_algorithm)]
        algorithm: training::AlgorithmChoice,
    },

    /// Generate plausible sample inputs for a model
    Sample {
        /// Model id or name
        model: String,

        /// Seed for reproducible samples
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Request a prediction
    Predict {
        /// Model id or name
        model: String,

        /// Input value as field=value (repeatable)
        #[arg(long = "input", short, value_parser = predict::parse_key_val)]
        inputs: Vec<(String, String)>,

        /// Start from generated sample inputs; explicit inputs override them
        #[arg(long)]
        sample: bool,

        /// Seed for reproducible samples
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Manage persisted settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current config file
    Show,

    /// Persist the backend base URL
    SetUrl {
        /// Base URL, e.g. http://localhost:8000/api
        url: String,
    },

    /// Persist a bearer token; omit the value to clear it
    SetToken {
        value: Option<String>,
    },

    /// Persist the default output format
    SetFormat {
        value: output::OutputFormat,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config(cmd) = &cli.command {
        let format = cli.format.unwrap_or_default();
        return match cmd {
            ConfigCommands::Show => settings::show(format),
            ConfigCommands::SetUrl { url } => settings::set_url(url),
            ConfigCommands::SetToken { value } => settings::set_token(value.clone()),
            ConfigCommands::SetFormat { value } => settings::set_format(*value),
        };
    }

    let file = config::Config::load()?;
    let mut base = WorkbenchConfig::load().context("Failed to read WORKBENCH_* environment")?;
    if let Some(secs) = cli.timeout {
        base = base.with_request_timeout(Duration::from_secs(secs));
    }
    let resolved = session::resolve(base, &file, cli.api_url, cli.token, cli.format);
    let format = resolved.format;
    debug!(
        api_url = %resolved.workbench.api_url,
        authenticated = resolved.workbench.api_token.is_some(),
        "Resolved settings"
    );

    match cli.command {
        Commands::Models => {
            let workbench = session::open(resolved.workbench, None).await?;
            catalog::list_models(workbench.state().catalog(), format)?;
        }
        Commands::Schema { model } => {
            let workbench = session::open(resolved.workbench, None).await?;
            catalog::show_schema(workbench.state().catalog(), &model, format)?;
        }
        Commands::Metrics { model, algorithm } => {
            let mut workbench = session::open(resolved.workbench, None).await?;
            training::show_metrics(&mut workbench, &model, algorithm, format).await?;
        }
        Commands::Sample { model, seed } => {
            let workbench = session::open(resolved.workbench, None).await?;
            predict::show_sample(workbench.state().catalog(), &model, seed, format)?;
        }
        Commands::Predict {
            model,
            inputs,
            sample,
            seed,
        } => {
            let mut workbench = session::open(resolved.workbench, seed).await?;
            predict::run_prediction(&mut workbench, &model, inputs, sample, format).await?;
        }
        Commands::Config(_) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    let dump_metrics = cli.dump_metrics;

    let result = run(cli).await;

    if dump_metrics {
        eprint!("{}", WorkbenchMetrics::new().render());
    }
    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
