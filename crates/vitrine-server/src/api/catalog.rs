//! Public catalog browsing: list and lookup-by-id.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use vitrine_catalog::{ListParams, ListQuery};
use vitrine_core::{CanonicalProduct, ProductPage};

use crate::middleware::RequestId;

use super::{map_catalog_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductData {
    pub product: CanonicalProduct,
}

/// GET /api/v1/categories/{category}
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<ProductPage>>, ApiError> {
    let query = ListQuery::from(params);
    let page = state
        .catalog
        .list_products(&category, &query)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(page, req_id.0)))
}

/// GET /api/v1/categories/{category}/{id}
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let product = state
        .catalog
        .get_product(&category, &id)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(ProductData { product }, req_id.0)))
}
