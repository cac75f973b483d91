use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use handlers::{
    comments_handler, compile_handler, create_group_handler, create_organization_handler,
    create_user_handler, health_check, location_handler, page_handler, page_list_handler,
    posts_handler,
};

use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

use crate::config::ServerConfig;
use executor::StatementExecutor;
use typedb_client::TypeDbExecutor;

pub mod errors;
pub mod executor;
pub mod handlers;
pub mod models;
pub mod response_normalizer;
mod typedb_client;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn StatementExecutor>,
    pub config: ServerConfig,
}

pub fn build_router(app_state: AppState) -> Router {
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);
    Router::new()
        .route("/health", get(health_check))
        .route("/api/pages", get(page_list_handler))
        .route("/api/location/{place_id}", get(location_handler))
        .route("/api/user/{id}", get(page_handler))
        .route("/api/organization/{id}", get(page_handler))
        .route("/api/organisation/{id}", get(page_handler))
        .route("/api/group/{id}", get(page_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/comments", get(comments_handler))
        .route("/api/create-user", post(create_user_handler))
        .route("/api/create-organization", post(create_organization_handler))
        .route("/api/create-group", post(create_group_handler))
        .route("/api/compile", post(compile_handler))
        .with_state(Arc::new(app_state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}, typedb={} (database `{}`)",
        config.bind_address(),
        config.typedb.address,
        config.typedb.database
    );

    let executor = match TypeDbExecutor::connect(&config.typedb).await {
        Ok(executor) => Arc::new(executor),
        Err(e) => {
            log::error!("✗ Failed to connect to TypeDB at {}: {}", config.typedb.address, e);
            std::process::exit(1);
        }
    };
    log::info!("✓ Connected to TypeDB");

    let http_bind_address = config.bind_address();
    let app = build_router(AppState {
        executor,
        config: config.clone(),
    });

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "✗ FATAL: Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    println!("Backend running at http://{}", http_bind_address);
    if let Err(e) = axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }
    log::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to register Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Received shutdown signal, shutting down...");
}
