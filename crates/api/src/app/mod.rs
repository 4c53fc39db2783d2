//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/auth wiring and the cart session state
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppConfig, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(build_router(services))
}

/// Wire routes around an already-built service set. Split out so tests can
/// keep a handle on the services.
pub fn build_router(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState { keys: services.keys.clone() };

    // Session routes: bearer token required.
    let session = routes::session_router().layer(axum::middleware::from_fn_with_state(
        auth_state.clone(),
        middleware::session_middleware,
    ));

    // Admin routes: session first, then the live is_admin check.
    let admin = routes::admin::router()
        .layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::admin_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(session)
        .nest("/admin", admin)
        .layer(Extension(services))
}
