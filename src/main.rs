use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vulntracker_api::chat::{ChatModel, GeminiClient};
use vulntracker_api::config::{self, AppConfig, LogFormat};
use vulntracker_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use vulntracker_api::{app, is_development, AppState};

#[derive(Debug, Parser)]
#[command(name = "vulntracker-api", version, about = "VulnTracker API server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "VULNTRACKER_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Serve from a JSON fixture file instead of Postgres
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn open_store(args: &Args, config: &AppConfig) -> anyhow::Result<Store> {
    if let Some(path) = &args.fixtures {
        let store = MemoryStore::from_path(path)
            .with_context(|| format!("failed to load fixtures from {}", path.display()))?;
        tracing::info!("Serving fixture data from {}", path.display());
        return Ok(Store::Memory(store));
    }
    if config.database.url.is_none() {
        bail!("DATABASE_URL is not set; pass --fixtures <file> to run without Postgres");
    }
    let pool = DatabaseManager::connect(&config.database).await?;
    Ok(Store::Postgres(PgStore::new(pool, config.database.enable_query_logging)))
}

fn port(args: &Args) -> u16 {
    args.port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(5000)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET_KEY, GOOGLE_API_KEY are picked up
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = config::config();
    init_tracing(config);
    tracing::info!("Starting VulnTracker API in {:?} mode", config.environment);

    if is_development!() {
        tracing::warn!("Development mode: fallback JWT secret and local CORS origins are in effect");
    } else if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET_KEY is not set; login and protected routes will fail");
    }

    let store = open_store(&args, config).await?;

    let chat: Option<Arc<dyn ChatModel>> = match GeminiClient::from_config(&config.chat)? {
        Some(client) => Some(Arc::new(client)),
        None => {
            tracing::warn!("GOOGLE_API_KEY is not set; /api/chat will return 503");
            None
        }
    };

    let state = AppState::new(store, chat);
    let router = app(state.clone(), config);

    let bind_addr = format!("{}:{}", args.bind, port(&args));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("VulnTracker API listening on http://{}", bind_addr);

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state.store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
