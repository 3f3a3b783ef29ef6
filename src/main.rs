use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tourneyhub::{
    cli::{self, Cli},
    AppConfig, AppState, JsonFileRecordStore,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourneyhub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(data_dir) = args.data_dir.clone() {
        config = config.with_data_dir(data_dir);
    }
    debug!(data_dir = %config.data_dir.display(), tie_break = %config.tie_break, "Configuration loaded");

    let store = match JsonFileRecordStore::open(&config.data_dir).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "Failed to open data directory");
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(Arc::new(store), &config);
    if let Err(err) = cli::run(&state, args.command).await {
        error!(error = %err, "Command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
