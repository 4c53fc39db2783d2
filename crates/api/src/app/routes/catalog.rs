//! Public catalog browsing and the search flow.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use jengamart_catalog::{SearchRequest, group_by_category};
use jengamart_core::{CategoryId, ProductId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Product detail shows at most this many neighbors.
const RELATED_LIMIT: usize = 4;

pub fn router() -> Router {
    Router::new()
        .route("/catalog/featured", get(featured))
        .route("/catalog/products", get(list_products))
        .route("/catalog/products/:id", get(product_detail))
        .route("/catalog/categories", get(categories))
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

pub async fn featured(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_featured().await {
        Ok(items) => {
            let items = items.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// The search flow: direct matches, category groups for display, and the
/// "did you mean" suggestion when a non-empty query matched nothing.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<CatalogQuery>,
) -> axum::response::Response {
    let category_id: Option<CategoryId> =
        match params.category.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_id",
                        "invalid category id",
                    );
                }
            },
            None => None,
        };

    let request = SearchRequest {
        query: params.search.unwrap_or_default(),
        category_id,
    };
    let result = match services.search.search(&request).await {
        Ok(r) => r,
        Err(e) => return errors::store_error_to_response(e),
    };
    let categories = match services.catalog.list_categories().await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };

    let groups = group_by_category(&result.items, &categories);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": result.items.iter().map(dto::product_to_json).collect::<Vec<_>>(),
            "groups": groups.iter().map(dto::group_to_json).collect::<Vec<_>>(),
            "suggestion": result.suggestion.as_ref().map(dto::suggestion_to_json),
        })),
    )
        .into_response()
}

pub async fn product_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    let product = match services.catalog.get_product(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let related = match services
        .catalog
        .related_products(product.category_id, product.id, RELATED_LIMIT)
        .await
    {
        Ok(r) => r,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "product": dto::product_to_json(&product),
            "related": related.iter().map(dto::product_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_categories().await {
        Ok(categories) => {
            let items = categories.iter().map(dto::category_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
