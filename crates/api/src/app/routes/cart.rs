//! Session cart endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use jengamart_core::ProductId;

use crate::app::services::{AppServices, Cart};
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/cart/items/:product_id", post(add_item).delete(remove_item))
}

async fn cart_response(services: &AppServices, cart: &Cart) -> axum::response::Response {
    match services.catalog.products_by_ids(&cart.product_ids).await {
        Ok(items) => (StatusCode::OK, Json(dto::cart_to_json(&items))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn view_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let cart = services.carts.get(session.user_id());
    cart_response(&services, &cart).await
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.catalog.get_product(product_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => return errors::store_error_to_response(e),
    }

    let cart = services.carts.add(session.user_id(), product_id);
    cart_response(&services, &cart).await
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    // Removing an item that is not in the cart is a harmless no-op.
    let cart = services.carts.remove(session.user_id(), product_id);
    cart_response(&services, &cart).await
}
