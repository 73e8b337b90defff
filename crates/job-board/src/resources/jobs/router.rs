use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use super::catalog::JobCatalog;
use super::domain::Job;
use crate::resources::ResourceError;
use crate::schema::parse_body;
use crate::store::StoredRecord;

/// Serves `/api/jobs` with or without a trailing slash.
pub fn job_router(catalog: Arc<JobCatalog>) -> Router {
    let handlers = post(create_handler).get(list_handler);
    Router::new()
        .route("/api/jobs", handlers.clone())
        .route("/api/jobs/", handlers)
        .with_state(catalog)
}

pub(crate) async fn create_handler(
    State(catalog): State<Arc<JobCatalog>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredRecord<Job>>), ResourceError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let payload = parse_body(content_type, &body)?;
    let stored = catalog.create_job(&payload).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(crate) async fn list_handler(
    State(catalog): State<Arc<JobCatalog>>,
) -> Result<Json<Vec<StoredRecord<Job>>>, ResourceError> {
    Ok(Json(catalog.list_jobs().await?))
}
