use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::Job;
use crate::resources::ResourceError;
use crate::store::{DocumentCollection, Record, StoredRecord};

/// Create and list operations over job postings.
pub struct JobCatalog {
    jobs: Arc<dyn DocumentCollection<Job>>,
}

impl JobCatalog {
    pub fn new(jobs: Arc<dyn DocumentCollection<Job>>) -> Self {
        Self { jobs }
    }

    /// Persist the recognized subset of `payload` and return it with its generated id.
    pub async fn create_job(&self, payload: &Value) -> Result<StoredRecord<Job>, ResourceError> {
        let job = Job::from_payload(payload)?;
        let stored = self.jobs.insert(job).await.inspect_err(|err| {
            warn!(collection = Job::COLLECTION, error = %err, "job insert failed");
        })?;
        info!(collection = Job::COLLECTION, id = %stored.id, "job created");
        Ok(stored)
    }

    /// Every job in storage-native order.
    pub async fn list_jobs(&self) -> Result<Vec<StoredRecord<Job>>, ResourceError> {
        let jobs = self.jobs.find_all().await.inspect_err(|err| {
            warn!(collection = Job::COLLECTION, error = %err, "job listing failed");
        })?;
        Ok(jobs)
    }
}
