use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod api;
mod config;
mod guard;
mod models;
mod router;
mod session;
mod shell;
mod validation;
mod views;

use common::storage::{KeyValueStore, StorageConfig};

use crate::api::ApiClient;
use crate::config::DashboardConfig;
use crate::session::SessionStore;
use crate::shell::Shell;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting AdminHub dashboard client");

    // Open durable client state
    let storage_config = StorageConfig::from_env()?;
    let store = KeyValueStore::open(&storage_config)?;
    let session = SessionStore::new(store);

    // Wire the remote query client and the shell
    let config = DashboardConfig::from_env()?;
    let api = ApiClient::new(&config, session.clone());

    info!("Dashboard client initialized, endpoint {}", config.api_url);

    let shell = Shell::new(config, session, api);
    shell.run().await
}
