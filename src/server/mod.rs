pub mod handlers;
pub mod types;

use crate::{
    Error, Result,
    config::{Config, CorsConfig, ServerConfig},
    triage::Triage,
};
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    // Model and vocabulary are loaded before the listener is bound
    let triage = Triage::load(&config.model, &config.severity).await?;

    let app_state = handlers::AppState {
        triage: Arc::new(triage),
    };
    let app = router(app_state, &config.server.cors)?;

    let addr = bind_addr(&config.server)?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn bind_addr(server: &ServerConfig) -> Result<SocketAddr> {
    let ip: IpAddr = server.host.parse().map_err(|_| {
        Error::config(format!(
            "server.host (or MEDITRIAGE_HOST) must be an IP address, got '{}'",
            server.host
        ))
    })?;
    Ok(SocketAddr::new(ip, server.port))
}

/// Routes are served both at the root and under `/api`.
pub fn router(state: handlers::AppState, cors: &CorsConfig) -> Result<Router> {
    let app = Router::new()
        .route("/", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/api/predict", post(handlers::predict))
        .route("/symptoms", get(handlers::symptoms))
        .route("/api/symptoms", get(handlers::symptoms))
        .with_state(state)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    let origins = if cors.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| Error::config(format!("invalid CORS origin '{}'", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
