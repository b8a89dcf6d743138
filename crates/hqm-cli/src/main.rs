use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod exit;

use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "hqm")]
#[command(about = "High-quality momentum screener", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, score, select and size the universe; write the spreadsheet.
    Run {
        /// Layered config paths in merge order (later overrides earlier)
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Universe CSV (one ticker per row, header required)
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Output spreadsheet path (overwritten)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Total portfolio budget
        #[arg(long)]
        budget: Option<f64>,

        /// Number of instruments to retain
        #[arg(long)]
        top: Option<usize>,

        /// Symbols per request (1..=100)
        #[arg(long = "batch-size")]
        batch_size: Option<usize>,

        /// Max batch requests in flight
        #[arg(long)]
        concurrency: Option<usize>,

        /// Market-data API base URL
        #[arg(long = "base-url")]
        base_url: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = exit::classify(&err);
            tracing::error!(kind = kind.as_str(), "run failed: {err:#}");
            eprintln!("error[{}]: {err:#}", kind.as_str());
            ExitCode::from(kind.code())
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Run {
            config_paths,
            universe,
            output,
            budget,
            top,
            batch_size,
            concurrency,
            base_url,
        } => {
            let summary = commands::run::run(RunArgs {
                config_paths,
                universe,
                output,
                budget,
                top,
                batch_size,
                concurrency,
                base_url,
            })
            .await?;
            summary.print();
        }

        Commands::ConfigHash { paths } => {
            let loaded = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
