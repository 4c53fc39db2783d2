//! Registration, login, and the current-session endpoint.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use jengamart_auth::{hash_password, verify_password};
use jengamart_store::User;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn session_router() -> Router {
    Router::new().route("/auth/me", get(me))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let username = body.username.trim();
    let email = body.email.trim();

    if username.is_empty() || email.is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username, email and password are required",
        );
    }
    if body.password != body.confirm_password {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "passwords do not match",
        );
    }

    match services.users.find_by_username(username).await {
        Ok(Some(_)) => return errors::json_error(StatusCode::CONFLICT, "conflict", "username already taken"),
        Ok(None) => {}
        Err(e) => return errors::store_error_to_response(e),
    }
    match services.users.find_by_email(email).await {
        Ok(Some(_)) => return errors::json_error(StatusCode::CONFLICT, "conflict", "email already registered"),
        Ok(None) => {}
        Err(e) => return errors::store_error_to_response(e),
    }

    let user = User::new(username, email, hash_password(&body.password));
    if let Err(e) = services.users.create_user(user.clone()).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(username, "registered new account");
    (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.users.find_by_email(body.email.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid email or password");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    if !verify_password(&body.password, &user.password_hash) {
        return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid email or password");
    }

    let token = match services.keys.issue(user.id, &user.username, user.is_admin) {
        Ok(t) => t,
        Err(_) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "failed to issue session token");
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "user": dto::user_to_json(&user),
        })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.users.find_by_id(session.user_id()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "account no longer exists"),
        Err(e) => errors::store_error_to_response(e),
    }
}
