use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::resources::{Application, ApplicationIntake, Job, JobCatalog, Resources};
use crate::store::{DocumentCollection, DocumentStore, Record, StoredRecord, StoreError};

pub(super) const JOB_ID: &str = "64b7f0c2a1e4d3f2b1c0a9e8";

pub(super) fn memory_resources() -> Resources {
    Resources::new(&DocumentStore::in_memory())
}

pub(super) fn offline_catalog() -> JobCatalog {
    JobCatalog::new(Arc::new(UnavailableCollection))
}

pub(super) fn offline_intake() -> ApplicationIntake {
    ApplicationIntake::new(Arc::new(UnavailableCollection))
}

pub(super) fn offline_router() -> Router {
    crate::resources::api_router(Arc::new(offline_catalog()), Arc::new(offline_intake()))
}

pub(super) fn rejecting_catalog() -> JobCatalog {
    JobCatalog::new(Arc::new(RejectingCollection))
}

/// Store whose every call fails as if the database were down.
pub(super) struct UnavailableCollection;

#[async_trait]
impl<T: Record> DocumentCollection<T> for UnavailableCollection {
    async fn insert(&self, _record: T) -> Result<StoredRecord<T>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Store that refuses every document shape but can still be read.
pub(super) struct RejectingCollection;

#[async_trait]
impl<T: Record> DocumentCollection<T> for RejectingCollection {
    async fn insert(&self, _record: T) -> Result<StoredRecord<T>, StoreError> {
        Err(StoreError::Rejected(format!(
            "{} validation failed: document failed validation",
            T::MODEL
        )))
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        Ok(Vec::new())
    }
}

pub(super) async fn post_json(router: Router, uri: &str, body: impl Into<Body>) -> Response {
    router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .expect("request builds"),
        )
        .await
        .expect("route executes")
}

pub(super) async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn expect_status(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    read_json_body(response).await
}

pub(super) fn sample_job() -> Job {
    Job {
        company_name: Some("Acme".to_string()),
        job_title: Some("Engineer".to_string()),
        job_description: Some("Maintain the water network telemetry".to_string()),
        requirements: vec!["SQL".to_string(), "Arabic".to_string()],
        language: Some("en".to_string()),
    }
}

pub(super) fn sample_application() -> Application {
    Application {
        name: Some("Sam".to_string()),
        email: Some("s@x.com".to_string()),
        phone: Some("+970599000000".to_string()),
        resume: Some("https://cdn.example.org/cv/sam.pdf".to_string()),
        job_id: Some(JOB_ID.parse().expect("valid id")),
        answers: vec!["yes".to_string()],
        language: Some("ar".to_string()),
    }
}
