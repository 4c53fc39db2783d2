//! Admin catalog maintenance. Nested under `/admin` behind the admin guard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use jengamart_catalog::{ProductDraft, ProductFilter};
use jengamart_core::{CategoryId, DomainError, ProductId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/bulk/featured", post(bulk_featured))
        .route("/products/bulk/prices", post(bulk_prices))
        .route("/categories", post(upsert_category))
        .route("/users/:id/promote", post(promote_user))
}

/// Dashboard listing: every product with its category name, ordered by
/// product name.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let mut products = match services.catalog.list_products(&ProductFilter::default()).await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };
    let categories = match services.catalog.list_categories().await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };
    products.sort_by(|a, b| a.name.cmp(&b.name));

    let items = products
        .iter()
        .map(|p| {
            let mut value = dto::product_to_json(p);
            let category_name = categories
                .iter()
                .find(|c| c.id == p.category_id)
                .map(|c| c.name.clone());
            value["category_name"] = serde_json::json!(category_name);
            value
        })
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProductPayload>,
) -> axum::response::Response {
    let category_id: CategoryId = match body.category_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id"),
    };

    let draft = ProductDraft {
        name: body.name,
        category_id,
        price: body.price,
        description: body.description,
        image_file: body.image_file,
        featured: body.featured,
    };
    let product = match draft.into_product(ProductId::new()) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.product_name_exists(&product.name, None).await {
        Ok(true) => {
            return errors::domain_error_to_response(DomainError::conflict(
                "a product with this name already exists",
            ));
        }
        Ok(false) => {}
        Err(e) => return errors::store_error_to_response(e),
    }

    if let Err(e) = services.catalog.insert_product(product.clone()).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductPayload>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    let category_id: CategoryId = match body.category_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id"),
    };

    let draft = ProductDraft {
        name: body.name,
        category_id,
        price: body.price,
        description: body.description,
        image_file: body.image_file,
        featured: body.featured,
    };
    let product = match draft.into_product(id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.product_name_exists(&product.name, Some(id)).await {
        Ok(true) => {
            return errors::domain_error_to_response(DomainError::conflict(
                "a product with this name already exists",
            ));
        }
        Ok(false) => {}
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.catalog.update_product(product.clone()).await {
        Ok(true) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    // The removed row goes back to the caller, image reference included,
    // so the asset can be cleaned up out of band.
    match services.catalog.delete_product(id).await {
        Ok(Some(product)) => {
            (StatusCode::OK, Json(serde_json::json!({ "deleted": dto::product_to_json(&product) })))
                .into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn upsert_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CategoryPayload>,
) -> axum::response::Response {
    let name = body.name.trim();
    if name.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "name cannot be empty");
    }
    match services.catalog.upsert_category(name).await {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn bulk_featured(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BulkFeaturedRequest>,
) -> axum::response::Response {
    match services.catalog.set_all_featured(body.featured).await {
        Ok(updated) => (StatusCode::OK, Json(serde_json::json!({ "updated": updated }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn bulk_prices(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BulkPricesRequest>,
) -> axum::response::Response {
    // Bounded both ways: below so prices stay non-negative, above so a fat
    // finger cannot overflow stored prices past f64 range.
    if !body.percent.is_finite() || body.percent <= -100.0 || body.percent > 1000.0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "percent must be between -100 and 1000",
        );
    }
    match services.catalog.adjust_all_prices(body.percent).await {
        Ok(updated) => (StatusCode::OK, Json(serde_json::json!({ "updated": updated }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn promote_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    match services.users.grant_admin(id).await {
        Ok(true) => {
            (StatusCode::OK, Json(serde_json::json!({ "id": id.to_string(), "is_admin": true })))
                .into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
