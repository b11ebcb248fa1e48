//! HTTP surface of the todo service.
//!
//! # Routes
//!
//! Relative to the configured base path (default `/api/todos`):
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `` | [`handlers::list_todos`] |
//! | POST | `` | [`handlers::create_todo`] |
//! | GET | `/{id}` | [`handlers::get_todo`] |
//! | PUT | `/{id}` | [`handlers::update_todo`] |
//! | DELETE | `/{id}` | [`handlers::delete_todo`] |
//! | GET | `/completed` | [`handlers::list_completed`] |
//! | GET | `/stats` | [`handlers::stats`] |
//! | POST | `/stats/reset` | [`handlers::reset_stats`] |
//! | GET | `/health` | [`handlers::health`] |
//!
//! Every response allows any origin, method, and header, and carries an
//! `x-request-id`.

mod error;
pub mod handlers;
mod middleware;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::services::TodoService;
use crate::{Error, Result};
use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::{get, post};
use std::future::Future;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The todo service.
    pub service: TodoService,
}

/// Builds the router with every todo route mounted under `base_path`.
///
/// `base_path` must be normalized (leading slash, no trailing slash), as
/// produced by [`crate::config::normalize_base_path`].
pub fn router(service: TodoService, base_path: &str) -> Router {
    let item = format!("{base_path}/{{id}}");

    Router::new()
        .route(
            base_path,
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            &format!("{base_path}/completed"),
            get(handlers::list_completed),
        )
        .route(&format!("{base_path}/stats"), get(handlers::stats))
        .route(
            &format!("{base_path}/stats/reset"),
            post(handlers::reset_stats),
        )
        .route(&format!("{base_path}/health"), get(handlers::health))
        .route(
            &item,
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { service })
}

/// Binds `config`'s address and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound, or the
/// server fails.
pub async fn serve<F>(service: TodoService, config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let app = router(service, &config.base_path);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::operation("bind", format!("{addr}: {e}")))?;

    tracing::info!(%addr, base_path = %config.base_path, "Starting todo HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::operation("serve", e))?;

    tracing::info!("Todo HTTP server stopped");
    Ok(())
}
