use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use backend_lib::{config::Settings, create_router, logging, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

/// Session authentication server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "GATEKEEP_CONFIG", default_value = backend_lib::config::CONFIG_FILE)]
    config: PathBuf,

    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    settings.validate()?;

    logging::init(&settings.logging)?;

    let addr = settings.bind_addr()?;
    info!(
        auth_type = ?settings.auth.auth_type,
        session_duration = settings.auth.session_duration,
        "starting gatekeep"
    );

    let state = Arc::new(AppState::from_settings(settings).await?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
