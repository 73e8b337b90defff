use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use super::domain::Application;
use super::intake::ApplicationIntake;
use crate::resources::ResourceError;
use crate::schema::parse_body;
use crate::store::StoredRecord;

pub fn application_router(intake: Arc<ApplicationIntake>) -> Router {
    let handlers = post(submit_handler).get(list_handler);
    Router::new()
        .route("/api/applications", handlers.clone())
        .route("/api/applications/", handlers)
        .with_state(intake)
}

pub(crate) async fn submit_handler(
    State(intake): State<Arc<ApplicationIntake>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredRecord<Application>>), ResourceError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let payload = parse_body(content_type, &body)?;
    let stored = intake.create_application(&payload).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(crate) async fn list_handler(
    State(intake): State<Arc<ApplicationIntake>>,
) -> Result<Json<Vec<StoredRecord<Application>>>, ResourceError> {
    Ok(Json(intake.list_applications().await?))
}
