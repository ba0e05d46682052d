//! Parley CLI and relay entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes the database and services, then
//! starts the relay server or runs a utility command.

mod http;
mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use parley_infra::config::{load_config, resolve_data_dir};
use state::AppState;

#[derive(Parser)]
#[command(name = "parley", version, about = "Chat-session relay for survey experiments")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Data directory (defaults to PARLEY_DATA_DIR or ~/.parley)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Listen host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective configuration as JSON
    CheckConfig,
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley_api=debug,parley_core=debug,parley_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = cli.data_dir.unwrap_or_else(resolve_data_dir);

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::init(data_dir).await?;

            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley relay listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!("Data directory: {}", state.data_dir.display())).dim()
            );
            println!(
                "  {}",
                console::style("Press Ctrl+C to stop").dim()
            );

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::CheckConfig => {
            let config = load_config(&data_dir).await;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
