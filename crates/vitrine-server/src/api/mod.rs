mod admin;
mod catalog;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use vitrine_catalog::Catalog;
use vitrine_core::CatalogError;

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn ok(data: T, request_id: String) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: message.clone(),
            error: ErrorBody {
                code: code.into(),
                message,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Storage detail is logged, not returned to the client.
pub(super) fn map_catalog_error(request_id: String, error: &CatalogError) -> ApiError {
    match error {
        CatalogError::Storage(detail) => {
            tracing::error!(request_id = %request_id, error = %detail, "catalog storage failure");
            ApiError::new(request_id, error.code(), "storage failure")
        }
        other => ApiError::new(request_id, other.code(), other.to_string()),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/summary", get(admin::summary))
        .route(
            "/api/v1/admin/categories/{category}/products",
            post(admin::create_product),
        )
        .route(
            "/api/v1/admin/categories/{category}/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/categories/{category}", get(catalog::list_products))
        .route(
            "/api/v1/categories/{category}/{id}",
            get(catalog::get_product),
        );

    Router::new()
        .merge(public_routes)
        .merge(admin_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.catalog.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                HealthData {
                    status: "ok",
                    store: "ok",
                },
                req_id.0,
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            let mut body = ApiResponse::ok(
                HealthData {
                    status: "degraded",
                    store: "unavailable",
                },
                req_id.0,
            );
            body.success = false;
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use vitrine_core::DocumentId;
    use vitrine_db::{
        Collection, DbError, DocumentStore, Filter, MemoryDocumentStore, RawDocument,
    };

    const TOKEN: &str = "test-admin-key";

    fn app_with(store: Arc<dyn DocumentStore>, auth: AuthState) -> Router {
        let catalog = Catalog::new(store, Duration::from_millis(500));
        build_app(
            AppState {
                catalog: Arc::new(catalog),
            },
            auth,
        )
    }

    fn app(store: Arc<dyn DocumentStore>) -> Router {
        app_with(store, AuthState::from_keys([TOKEN]))
    }

    async fn seed(store: &MemoryDocumentStore, collection: Collection, body: Value) -> DocumentId {
        let id = DocumentId::new();
        store
            .insert_many(collection, vec![RawDocument::new(id, body)])
            .await
            .expect("seed");
        id
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json parse")
        };
        (status, json)
    }

    /// Every read panics; writes are never reached by these tests.
    struct PanickingStore;

    #[async_trait]
    impl DocumentStore for PanickingStore {
        async fn find(
            &self,
            collection: Collection,
            _filter: &Filter,
        ) -> Result<Vec<RawDocument>, DbError> {
            panic!("find exploded in {collection}");
        }

        async fn find_by_id(
            &self,
            collection: Collection,
            _id: DocumentId,
        ) -> Result<Option<RawDocument>, DbError> {
            panic!("find_by_id exploded in {collection}");
        }

        async fn count(&self, collection: Collection, _filter: &Filter) -> Result<u64, DbError> {
            panic!("count exploded in {collection}");
        }

        async fn sum(
            &self,
            collection: Collection,
            _filter: &Filter,
            _field: &str,
        ) -> Result<Decimal, DbError> {
            panic!("sum exploded in {collection}");
        }

        async fn create(&self, collection: Collection, _body: Value) -> Result<RawDocument, DbError> {
            Err(DbError::Unavailable(collection.to_string()))
        }

        async fn update(
            &self,
            collection: Collection,
            _id: DocumentId,
            _patch: Value,
        ) -> Result<Option<RawDocument>, DbError> {
            Err(DbError::Unavailable(collection.to_string()))
        }

        async fn delete(
            &self,
            collection: Collection,
            _id: DocumentId,
        ) -> Result<Option<RawDocument>, DbError> {
            Err(DbError::Unavailable(collection.to_string()))
        }

        async fn insert_many(
            &self,
            collection: Collection,
            _docs: Vec<RawDocument>,
        ) -> Result<usize, DbError> {
            Err(DbError::Unavailable(collection.to_string()))
        }

        async fn ping(&self) -> Result<(), DbError> {
            Ok(())
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn admin_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("bad_request", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("unauthorized", StatusCode::UNAUTHORIZED),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "message").into_response();
            assert_eq!(response.status(), status, "{code}");
        }
    }

    #[test]
    fn storage_errors_hide_their_detail() {
        let err = map_catalog_error(
            "req-1".to_string(),
            &CatalogError::Storage("connection reset by 10.0.0.4".to_string()),
        );
        assert_eq!(err.error.code, "internal_error");
        assert_eq!(err.message, "storage failure");
    }

    #[tokio::test]
    async fn health_reports_ok_with_request_id() {
        let response = app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-health")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["requestId"], "req-health");
    }

    #[tokio::test]
    async fn list_merges_watch_schemas_into_one_page() {
        let store = Arc::new(MemoryDocumentStore::new());
        seed(
            &store,
            Collection::Watches,
            json!({"name": "Heritage", "price": 1000, "discountPercent": 0}),
        )
        .await;
        seed(
            &store,
            Collection::NewWatches,
            json!({"title": "Aero", "mrp": 2000, "discountPercent": 10}),
        )
        .await;

        let (status, json) = send(
            app(store),
            get_request("/api/v1/categories/WATCH?sort=price&order=asc&limit=10&page=1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let prices: Vec<f64> = json["data"]["products"]
            .as_array()
            .expect("products array")
            .iter()
            .filter_map(|p| p["finalPrice"].as_f64())
            .collect();
        assert_eq!(prices, vec![1000.0, 1800.0]);
        assert_eq!(
            json["data"]["pagination"],
            json!({"page": 1, "limit": 10, "total": 2, "pages": 1})
        );
    }

    #[tokio::test]
    async fn list_with_unavailable_sources_is_an_empty_success() {
        let store = Arc::new(MemoryDocumentStore::new());
        seed(&store, Collection::Skincare, json!({"name": "Serum"})).await;
        store.set_unavailable(Collection::Skincare, true);

        let (status, json) = send(app(store), get_request("/api/v1/categories/skincare")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["products"], json!([]));
        assert_eq!(json["data"]["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn list_rejects_blank_and_unknown_categories() {
        let store = Arc::new(MemoryDocumentStore::new());

        let (status, json) = send(app(store.clone()), get_request("/api/v1/categories/%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "bad_request");

        let (status, json) = send(app(store), get_request("/api/v1/categories/gadgets")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "unsupported category: gadgets");
    }

    #[tokio::test]
    async fn lookup_finds_saree_under_women_alias() {
        let store = Arc::new(MemoryDocumentStore::new());
        let id = seed(&store, Collection::Sarees, json!({"title": "Banarasi", "mrp": 5000})).await;

        let (status, json) = send(
            app(store),
            get_request(&format!("/api/v1/categories/women/{id}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["product"]["id"], id.to_string());
        assert_eq!(json["data"]["product"]["subCategory"], "saree");
        assert_eq!(json["data"]["product"]["name"], "Banarasi");
    }

    #[tokio::test]
    async fn lookup_classifies_bad_and_missing_ids() {
        let store = Arc::new(MemoryDocumentStore::new());

        let (status, json) = send(
            app(store.clone()),
            get_request("/api/v1/categories/watches/not-an-id"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let missing = DocumentId::new();
        let (status, json) = send(
            app(store),
            get_request(&format!("/api/v1/categories/watches/{missing}")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().is_some_and(|m| m.contains("not found")));
    }

    #[tokio::test]
    async fn admin_routes_require_bearer_token() {
        let store = Arc::new(MemoryDocumentStore::new());

        let (status, json) = send(app(store.clone()), get_request("/api/v1/admin/summary")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");

        let (status, json) = send(
            app(store),
            admin_request(Method::GET, "/api/v1/admin/summary", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn admin_routes_open_when_auth_disabled() {
        let store = Arc::new(MemoryDocumentStore::new());
        let app = app_with(store, AuthState::from_keys(std::iter::empty()));
        let (status, _) = send(app, get_request("/api/v1/admin/summary")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_summary_folds_sub_paths_into_categories() {
        let store = Arc::new(MemoryDocumentStore::new());
        seed(&store, Collection::Accessories, json!({"name": "Belt", "stock": 3})).await;
        seed(&store, Collection::Shoes, json!({"name": "Loafer", "stock": 0})).await;
        seed(&store, Collection::Orders, json!({"status": "pending", "totalAmount": 250})).await;
        seed(&store, Collection::Orders, json!({"status": "cancelled", "totalAmount": 900})).await;

        let (status, json) = send(
            app(store),
            admin_request(Method::GET, "/api/v1/admin/summary", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["categoryCounts"]["accessories"], 2);
        assert_eq!(data["inventory"]["accessories"], 1);
        assert_eq!(data["totalProducts"], 2);
        assert_eq!(data["totalOrders"], 2);
        assert_eq!(data["pendingOrders"], 1);
        assert_eq!(data["totalRevenue"].as_f64(), Some(250.0));
    }

    #[tokio::test]
    async fn admin_create_update_delete_round_trip() {
        let store = Arc::new(MemoryDocumentStore::new());

        let (status, json) = send(
            app(store.clone()),
            admin_request(
                Method::POST,
                "/api/v1/admin/categories/watches/products",
                Some(json!({"title": "Pilot", "mrp": 1500})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json["data"]["product"]["id"]
            .as_str()
            .expect("created id")
            .to_string();
        assert_eq!(json["data"]["product"]["schemaType"], "new");
        assert!(json["data"]["product"]["createdAt"].is_string());

        let (status, json) = send(
            app(store.clone()),
            admin_request(
                Method::PUT,
                &format!("/api/v1/admin/categories/watches/products/{id}"),
                Some(json!({"title": "Pilot II"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["product"]["title"], "Pilot II");
        assert_eq!(json["data"]["product"]["mrp"].as_f64(), Some(1500.0));

        let (status, _) = send(
            app(store.clone()),
            admin_request(
                Method::DELETE,
                &format!("/api/v1/admin/categories/watches/products/{id}"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            app(store),
            get_request(&format!("/api/v1/categories/watches/{id}")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_create_rejects_non_object_body() {
        let store = Arc::new(MemoryDocumentStore::new());
        let (status, json) = send(
            app(store),
            admin_request(
                Method::POST,
                "/api/v1/admin/categories/skincare/products",
                Some(json!(["not", "an", "object"])),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn admin_update_of_unknown_id_is_not_found() {
        let store = Arc::new(MemoryDocumentStore::new());
        let missing = DocumentId::new();
        let (status, json) = send(
            app(store),
            admin_request(
                Method::PUT,
                &format!("/api/v1/admin/categories/shoes/products/{missing}"),
                Some(json!({"stock": 4})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn list_survives_a_panicking_store_with_zeroed_pagination() {
        let (status, json) = send(
            app(Arc::new(PanickingStore)),
            get_request("/api/v1/categories/watches"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["products"], json!([]));
        assert_eq!(
            json["data"]["pagination"],
            json!({"page": 0, "limit": 0, "total": 0, "pages": 0})
        );
    }

    #[tokio::test]
    async fn summary_survives_a_panicking_store_with_zeroed_figures() {
        let (status, json) = send(
            app(Arc::new(PanickingStore)),
            admin_request(Method::GET, "/api/v1/admin/summary", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["totalOrders"], 0);
        assert_eq!(json["data"]["totalProducts"], 0);
    }
}
