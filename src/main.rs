//! Application entry point.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use withdrawal_workflow::api::create_router;
use withdrawal_workflow::app::{AppState, ReaperConfig, WorkflowConfig, spawn_reaper};
use withdrawal_workflow::infra::{
    BackendClient, BackendConfig, HttpProfileStore, HttpTransactionLedger, UuidIdGenerator,
};

/// Application configuration
struct Config {
    backend: BackendConfig,
    host: String,
    port: u16,
    workflow: WorkflowConfig,
    reaper: ReaperConfig,
}

impl Config {
    fn from_env() -> Result<Self> {
        let backend = BackendConfig::from_env().context("Invalid back-end configuration")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Ok(Self {
            backend,
            host,
            port,
            workflow: WorkflowConfig::from_env(),
            reaper: ReaperConfig::from_env(),
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("Withdrawal workflow service v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    info!("Initializing infrastructure...");

    let backend = BackendClient::new(&config.backend).context("Failed to build back-end client")?;
    let profile_store = HttpProfileStore::with_client(backend.clone());
    let ledger = HttpTransactionLedger::with_client(backend);
    info!(
        base_url = %config.backend.base_url,
        authenticated = config.backend.api_token.is_some(),
        "   Back-end clients created"
    );

    let app_state = Arc::new(AppState::with_config(
        Arc::new(profile_store),
        Arc::new(ledger),
        Arc::new(UuidIdGenerator),
        config.workflow.clone(),
    ));
    info!(landing_route = %config.workflow.landing_route, "   Workflow service ready");

    let reaper_shutdown_tx = if config.reaper.enabled {
        let (_reaper_handle, shutdown_tx) =
            spawn_reaper(Arc::clone(&app_state.service), config.reaper.clone());
        info!(
            "   Workflow reaper started (poll: {}s, idle ttl: {}s)",
            config.reaper.poll_interval.as_secs(),
            config.reaper.idle_ttl.as_secs()
        );
        Some(shutdown_tx)
    } else {
        info!("   Workflow reaper disabled");
        None
    };

    let router = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server starting on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(tx) = reaper_shutdown_tx {
        let _ = tx.send(true);
    }

    info!("Server shutdown complete");
    Ok(())
}
