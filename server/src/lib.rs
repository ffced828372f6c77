//! HTTP service for a single `todos` table.
//!
//! # Overview
//! `app` builds the router over a `TodoStore`; `run` serves it on a bound
//! listener until Ctrl+C or SIGTERM. The binary in `main.rs` loads
//! `Config`, waits for the schema via `startup::ensure_schema`, then calls
//! `run`.

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod startup;
pub mod storage;

pub use config::Config;
pub use error::AppError;
pub use startup::{ensure_schema, RetryPolicy};
pub use storage::{Backend, StoreError, Todo, TodoStore, TITLE_MAX_CHARS};

use routes::{create_todo, favicon_handler, health_handler, list_todos, root_handler};

pub fn app(store: TodoStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(root_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route("/health", get(health_handler))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/api/todos", get(list_todos).post(create_todo))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(%err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
