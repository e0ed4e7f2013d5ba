// ABOUTME: Entry point for the talkiepi voice bridge client.
// ABOUTME: Resolves configuration, runs one session, and exits on SIGINT/SIGTERM.

mod cli;

use clap::Parser;
use cli::Cli;
use talkiepi::config;
use talkiepi::error::Result;
use talkiepi::lifecycle;
use talkiepi::session::TransportSession;
use talkiepi::shutdown::ShutdownToken;
use talkiepi::signals::SignalWatcher;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    if let Some(path) = &config_path {
        println!("{}", path.display());
    }

    let config = config::resolve(cli.connection_config(), config_path.as_deref())?;

    let reason = lifecycle::run(
        config,
        TransportSession::new,
        ShutdownToken::new(),
        SignalWatcher::arm,
    )
    .await?;

    tracing::debug!(?reason, "exiting");
    Ok(())
}
