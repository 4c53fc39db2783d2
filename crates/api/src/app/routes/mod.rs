use axum::Router;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod system;

/// Routes open to everyone.
pub fn public_router() -> Router {
    Router::new()
        .merge(catalog::router())
        .merge(auth::public_router())
}

/// Routes requiring a verified session.
pub fn session_router() -> Router {
    Router::new()
        .merge(auth::session_router())
        .merge(cart::router())
}
