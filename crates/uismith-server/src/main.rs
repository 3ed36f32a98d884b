//! uismith web server
//!
//! Serves the browser form and the generation API. The server is stateless
//! between requests: each generation is one validated relay call, and the
//! page keeps its own version history.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use generation::{GenerationConfig, Generator};
use repo_context::RepoExtractor;

use handlers::AppState;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

fn bind_addr() -> SocketAddr {
    let raw = std::env::var("UISMITH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    match raw.parse() {
        Ok(addr) => addr,
        Err(e) => {
            log::error!("Invalid UISMITH_ADDR {:?}: {}", raw, e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging - shows logs in the terminal, RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("uismith starting...");

    let config = GenerationConfig::from_env();
    let generator = match Generator::from_config(config) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            log::error!("Failed to initialize generation backend: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Active backend: {}",
        generator.current_backend_name().await
    );

    let extractor = match RepoExtractor::new(std::env::var("UISMITH_GITHUB_TOKEN").ok()) {
        Ok(extractor) => extractor,
        Err(e) => {
            log::error!("Failed to build GitHub client: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        generator,
        extractor,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/generate", post(handlers::generate))
        .route("/api/refine", post(handlers::refine))
        .route("/api/health", get(handlers::health))
        .route("/api/backends", get(handlers::backends))
        .route("/api/backend", post(handlers::switch_backend))
        .layer(cors)
        .with_state(state);

    let addr = bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    log::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
    }
}
