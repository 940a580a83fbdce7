//! Management console
//!
//! Command-line host for the management API client. The session, token and
//! theme live in a state file so consecutive invocations share one login.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use api::{ApiClient, Services, SessionManager, UnauthorizedHook};
use clap::Parser;
use common::config::ClientConfig;
use common::preferences::ThemeStore;
use common::storage::{FileStore, KeyValueStore};
use common::token::TokenStore;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use crate::cli::Cli;
use crate::commands::Console;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config =
        ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Using API at {}", config.base_url);

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.state_file).with_context(|| {
            format!("Failed to open state file {}", config.state_file.display())
        })?,
    );
    let tokens = TokenStore::new(store.clone())?;

    let session_rejected = Arc::new(AtomicBool::new(false));
    let on_unauthorized: UnauthorizedHook = {
        let session_rejected = session_rejected.clone();
        Arc::new(move || {
            warn!("The API rejected the session");
            session_rejected.store(true, Ordering::SeqCst);
        })
    };

    let client = ApiClient::from_config(&config, tokens, on_unauthorized)?;
    let sessions = SessionManager::new(client.clone(), store.clone());
    if let Some(session) = sessions.restore()? {
        info!("Continuing session of {}", session.username);
    }

    let console = Console {
        sessions,
        services: Services::new(client),
        themes: ThemeStore::new(store),
    };

    let result = commands::run(&console, cli.command).await;

    if session_rejected.load(Ordering::SeqCst) {
        eprintln!("Your session has ended. Run `console login <username>` to sign in again.");
    }

    result
}
