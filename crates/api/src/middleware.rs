use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use jengamart_auth::SessionKeys;

use crate::app::services::AppServices;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub keys: SessionKeys,
}

/// Verify the bearer token and stash the session identity on the request.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .keys
        .verify(token)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(SessionContext::new(
        claims.sub,
        claims.username.clone(),
        claims.admin,
    ));

    Ok(next.run(req).await)
}

/// Gate admin routes on the store's current `is_admin` flag, not the one
/// baked into the token, so demotion takes effect immediately.
pub async fn admin_middleware(
    State(services): State<Arc<AppServices>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let session = req
        .extensions()
        .get::<SessionContext>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user = services
        .users
        .find_by_id(session.user_id())
        .await
        .map_err(|_e| StatusCode::INTERNAL_SERVER_ERROR)?;

    match user {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
