//! HTTP resources backed by the document store.
//!
//! Each resource owns its record shape and a component exposing create/list. [`api_router`]
//! dispatches by path prefix to the matching component.

pub mod applications;
mod error;
pub mod jobs;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;

pub use applications::{application_router, Application, ApplicationIntake};
pub use error::ResourceError;
pub use jobs::{job_router, Job, JobCatalog};

use crate::store::DocumentStore;

/// Both components wired against one shared store connection.
pub struct Resources {
    pub jobs: Arc<JobCatalog>,
    pub applications: Arc<ApplicationIntake>,
}

impl Resources {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            jobs: Arc::new(JobCatalog::new(store.collection::<Job>())),
            applications: Arc::new(ApplicationIntake::new(store.collection::<Application>())),
        }
    }

    pub fn router(&self) -> Router {
        api_router(self.jobs.clone(), self.applications.clone())
    }
}

/// `/api/jobs` goes to the catalog, `/api/applications` to the intake.
pub fn api_router(jobs: Arc<JobCatalog>, applications: Arc<ApplicationIntake>) -> Router {
    job_router(jobs).merge(application_router(applications))
}
