// ABOUTME: Entry point for the hookbox binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and serves HTTP or runs one store operation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hookbox_core::DeleteOutcome;
use hookbox_server::{AppState, HookboxConfig, create_router};
use hookbox_store::{RecordStore, StoreError};

#[derive(Debug, Parser)]
#[command(name = "hookbox", version, about = "Persisted text-record webhook store")]
struct Cli {
    /// Data directory (overrides HOOKBOX_HOME)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Socket address to bind (overrides HOOKBOX_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print every record, one per line
    List,
    /// Append one record
    Append {
        /// Record text
        text: String,
    },
    /// Delete every record equal to TEXT, or all records when TEXT is omitted
    Delete {
        /// Exact text to remove
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hookbox=debug,tower_http=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = HookboxConfig::from_env().context("invalid configuration")?;
    if let Some(home) = cli.home {
        config.home = home;
    }

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let store = RecordStore::open(config.data_path())?;
            match store.list() {
                Ok(rendered) => {
                    println!("{}", rendered);
                    Ok(ExitCode::SUCCESS)
                }
                Err(StoreError::NoData) => {
                    eprintln!("No data available");
                    Ok(ExitCode::from(2))
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Append { text } => {
            let store = RecordStore::open(config.data_path())?;
            store.append(text)?;
            println!("Data saved successfully");
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { text } => {
            let store = RecordStore::open(config.data_path())?;
            match store.delete(text.as_deref().unwrap_or("")) {
                Ok(DeleteOutcome::NotFound) => {
                    eprintln!("{}", DeleteOutcome::NotFound);
                    Ok(ExitCode::from(2))
                }
                Ok(outcome) => {
                    println!("{}", outcome);
                    Ok(ExitCode::SUCCESS)
                }
                Err(StoreError::NoData) => {
                    eprintln!("No data available");
                    Ok(ExitCode::from(2))
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

async fn serve(config: HookboxConfig) -> anyhow::Result<()> {
    tracing::info!("hookbox starting up");

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("hookbox shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
