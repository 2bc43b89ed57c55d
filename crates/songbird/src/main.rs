//! Songbird entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use songbird::app::{build_orchestrator, BookingBackend};
use songbird::cli::{Cli, Commands};
use songbird::repl::ChatRepl;
use songbird::Result;
use songbird_api::{serve, ApiConfig, AppState};
use songbird_core::Settings;

fn main() {
    songbird_core::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let settings = Settings::from_env();

    let result = match cli.command {
        Some(Commands::Serve { host, port }) => run_server(&settings, host, port),
        Some(Commands::Chat {
            session,
            mock_booking,
        }) => run_chat(&settings, session, mock_booking),
        None => run_chat(&settings, None, false),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_server(settings: &Settings, host: String, port: u16) -> Result<()> {
    let orchestrator = build_orchestrator(settings, BookingBackend::Http)?;
    let config = ApiConfig::new(host, port);
    let state = AppState::new(config.clone(), Arc::new(orchestrator));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config, state))?;
    Ok(())
}

fn run_chat(settings: &Settings, session: Option<String>, mock_booking: bool) -> Result<()> {
    let backend = if mock_booking {
        BookingBackend::Mock
    } else {
        BookingBackend::Http
    };
    let orchestrator = build_orchestrator(settings, backend)?;
    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut repl = ChatRepl::new(Arc::new(orchestrator), session_id)?;
    repl.run()
}
