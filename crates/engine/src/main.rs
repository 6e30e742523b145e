//! Ambassador Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ambassador_domain::PermissionCatalog;
use ambassador_engine::infrastructure::{
    clock::SystemClock,
    grants::SqliteGrantRepo,
    memory::InMemoryGrantRepo,
    ports::{ClockPort, GrantRepo},
};
use ambassador_engine::{api, App, EngineConfig, GrantStoreKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambassador_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ambassador Engine");

    let config = EngineConfig::from_env();

    let grant_repo: Arc<dyn GrantRepo> = match &config.grant_store {
        GrantStoreKind::Sqlite { path } => {
            tracing::info!(path = %path, "Opening grant store");
            let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
            Arc::new(SqliteGrantRepo::new(path, clock).await?)
        }
        GrantStoreKind::Memory => {
            tracing::warn!("Using in-memory grant store, grants will not survive a restart");
            Arc::new(InMemoryGrantRepo::new())
        }
    };

    let catalog = PermissionCatalog::builtin();
    tracing::info!(count = catalog.len(), "Registered permissions");

    let app = Arc::new(App::new(catalog, grant_repo, config.max_create_attempts));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(cors.allow_origin(origins))
}
