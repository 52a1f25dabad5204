//! Bearer-guarded admin handlers: dashboard summary and product writes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use vitrine_catalog::DashboardSummary;

use crate::middleware::RequestId;

use super::catalog::ProductData;
use super::{map_catalog_error, ApiError, ApiResponse, AppState};

/// GET /api/v1/admin/summary
pub(super) async fn summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<DashboardSummary>> {
    let summary = state.catalog.summary().await;
    Json(ApiResponse::ok(summary, req_id.0))
}

/// POST /api/v1/admin/categories/{category}/products
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<ProductData>>), ApiError> {
    let product = state
        .catalog
        .create_product(&category, body)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProductData { product }, req_id.0)),
    ))
}

/// PUT /api/v1/admin/categories/{category}/products/{id}
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((category, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let product = state
        .catalog
        .update_product(&category, &id, patch)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(ProductData { product }, req_id.0)))
}

/// DELETE /api/v1/admin/categories/{category}/products/{id}
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let product = state
        .catalog
        .delete_product(&category, &id)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(ProductData { product }, req_id.0)))
}
