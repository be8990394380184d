//! HTTP server mode for REST API access to file exchange operations

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::demo::DemoReport;
use crate::engine::{
    ContractsDocument, DownloadDocument, ExchangeEngine, FilePayload, HealthReport, SystemStatus,
};
use crate::error::{Error, Result};
use crate::report::UploadReport;

/// Optional `?date=` on every date-aware route
#[derive(Debug, Default, Deserialize)]
struct DateQuery {
    /// DDMMYY, YYYY-MM-DD or "today"
    date: Option<String>,
}

/// Engine error rendered as a JSON error body
#[derive(Debug)]
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let mut body = json!({
            "status": "error",
            "error": self.0.to_string(),
        });
        if let Some(pattern) = self.0.expected_pattern() {
            body["expected_pattern"] = json!(pattern);
        }
        if let Error::ContractNotFound { available, .. } = &self.0 {
            body["available"] = json!(available);
        }

        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run an engine operation on the blocking pool
async fn blocking<T, F>(engine: &ExchangeEngine, op: F) -> ApiResult<T>
where
    F: FnOnce(&ExchangeEngine) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let engine = engine.clone();
    tokio::task::spawn_blocking(move || op(&engine))
        .await
        .map_err(|e| ApiError(Error::Other(format!("Worker task failed: {e}"))))?
        .map_err(ApiError)
}

/// Build the application router
pub fn router(engine: ExchangeEngine) -> Router {
    // Open CORS, the demo is called from browsers on any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/v1/contracts", get(contracts))
        .route("/api/v1/system/status", get(system_status))
        .route("/api/v1/upload/:endpoint", post(upload))
        .route("/api/v1/download/:endpoint", get(download))
        .route("/api/v1/download/:endpoint/file", get(download_file))
        .route("/api/v1/download/:endpoint/raw/file", get(download_raw_file))
        .route("/api/v1/demo/setup", post(demo_setup))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Start the HTTP server
pub async fn serve(engine: ExchangeEngine, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;
    serve_with_listener(listener, engine).await
}

/// Serve on an already bound listener
pub async fn serve_with_listener(listener: TcpListener, engine: ExchangeEngine) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        source = %engine.config().source_dir.display(),
        target = %engine.config().target_dir.display(),
        contracts = engine.registry().len(),
        "Starting HTTP server on http://{}",
        addr
    );

    axum::serve(listener, router(engine))
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Service overview
async fn index(State(engine): State<ExchangeEngine>) -> Json<Value> {
    Json(engine.overview())
}

/// Health check endpoint
async fn health(State(engine): State<ExchangeEngine>) -> Json<HealthReport> {
    Json(engine.health())
}

/// Full contract registry
async fn contracts(State(engine): State<ExchangeEngine>) -> Json<ContractsDocument> {
    Json(engine.contracts())
}

/// Files in both systems and per-contract expectations
async fn system_status(
    State(engine): State<ExchangeEngine>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<SystemStatus>> {
    let status = blocking(&engine, move |e| e.status(query.date.as_deref())).await?;
    Ok(Json(status))
}

/// Process the endpoint's source file into system B
async fn upload(
    State(engine): State<ExchangeEngine>,
    Path(endpoint): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<UploadReport>> {
    let report = blocking(&engine, move |e| e.upload(&endpoint, query.date.as_deref())).await?;
    Ok(Json(report))
}

/// Processed file as structured JSON
async fn download(
    State(engine): State<ExchangeEngine>,
    Path(endpoint): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<DownloadDocument>> {
    let doc = blocking(&engine, move |e| e.download(&endpoint, query.date.as_deref())).await?;
    Ok(Json(doc))
}

/// Processed file as an attachment
async fn download_file(
    State(engine): State<ExchangeEngine>,
    Path(endpoint): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Response> {
    let payload =
        blocking(&engine, move |e| e.target_file(&endpoint, query.date.as_deref())).await?;
    Ok(attachment(payload))
}

/// Source file bytes, untouched
async fn download_raw_file(
    State(engine): State<ExchangeEngine>,
    Path(endpoint): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Response> {
    let payload =
        blocking(&engine, move |e| e.source_file(&endpoint, query.date.as_deref())).await?;
    Ok(attachment(payload))
}

/// Create sample source files
async fn demo_setup(
    State(engine): State<ExchangeEngine>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<DemoReport>> {
    let report = blocking(&engine, move |e| e.demo_setup(query.date.as_deref())).await?;
    Ok(Json(report))
}

fn attachment(payload: FilePayload) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", payload.file_name);
    (
        [
            (header::CONTENT_TYPE, payload.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_endpoint_error_body() {
        let err = Error::contract_not_found("nope", vec!["csvtest".to_string()]);
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Unknown endpoint: nope");
        assert_eq!(body["available"], json!(["csvtest"]));
    }

    #[tokio::test]
    async fn test_missing_file_error_body() {
        let err = Error::file_not_found("csv_input_080725.csv", "080725");
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["expected_pattern"], "csv_input_080725.csv");
        assert!(body.get("available").is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_server_error() {
        let err = Error::write_failure("/readonly/out.csv", "permission denied");
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment(FilePayload {
            file_name: "csv_output_080725.csv".to_string(),
            path: std::path::PathBuf::from("/tmp/csv_output_080725.csv"),
            content_type: "text/csv; charset=utf-8",
            bytes: b"id\n1\n".to_vec(),
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"csv_output_080725.csv\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    }
}
