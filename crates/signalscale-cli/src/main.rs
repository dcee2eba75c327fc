mod request;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use signalscale_core::EngineConfig;
use signalscale_engine::Engine;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "signalscale-cli")]
#[command(about = "Brand and competitor intelligence runs from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one analysis and print the JSON result to stdout.
    Run {
        /// Request file, JSON or YAML (by extension).
        #[arg(long, env = "SIGNALSCALE_REQUEST")]
        request: PathBuf,
        /// Override the request's mode.
        #[arg(long)]
        mode: Option<String>,
        /// Print compact JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
    /// Print the resolved configuration, secrets redacted.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` must be loaded before clap reads `SIGNALSCALE_REQUEST`.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = signalscale_core::load_engine_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            request,
            mode,
            compact,
        } => {
            let outcome = run(config, &request, mode, compact).await;
            if let Err(e) = &outcome {
                tracing::error!(request = %request.display(), error = %format!("{e:#}"), "run failed");
            }
            outcome
        }
        Commands::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}

async fn run(
    config: EngineConfig,
    path: &std::path::Path,
    mode: Option<String>,
    compact: bool,
) -> anyhow::Result<()> {
    let mut request = request::load_request(path)?;
    if let Some(mode) = mode {
        tracing::info!(from = %request.mode, to = %mode, "mode overridden");
        request.mode = mode;
    }
    tracing::info!(
        request = %path.display(),
        brand = %request.brand.name,
        competitors = request.competitors.len(),
        "request loaded"
    );

    let engine = Engine::from_config(config).context("failed to build collectors")?;
    let result = engine.run(request).await?;

    let rendered = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{rendered}");
    Ok(())
}
