use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::Application;
use crate::resources::ResourceError;
use crate::store::{DocumentCollection, Record, StoredRecord};

/// Create and list operations over applications.
pub struct ApplicationIntake {
    applications: Arc<dyn DocumentCollection<Application>>,
}

impl ApplicationIntake {
    pub fn new(applications: Arc<dyn DocumentCollection<Application>>) -> Self {
        Self { applications }
    }

    /// Persist the recognized subset of `payload`. The referenced job is not looked up.
    pub async fn create_application(
        &self,
        payload: &Value,
    ) -> Result<StoredRecord<Application>, ResourceError> {
        let application = Application::from_payload(payload)?;
        let stored = self
            .applications
            .insert(application)
            .await
            .inspect_err(|err| {
                warn!(
                    collection = Application::COLLECTION,
                    error = %err,
                    "application insert failed"
                );
            })?;
        info!(
            collection = Application::COLLECTION,
            id = %stored.id,
            job_id = ?stored.record.job_id.map(|id| id.to_hex()),
            "application received"
        );
        Ok(stored)
    }

    pub async fn list_applications(
        &self,
    ) -> Result<Vec<StoredRecord<Application>>, ResourceError> {
        let applications = self.applications.find_all().await.inspect_err(|err| {
            warn!(
                collection = Application::COLLECTION,
                error = %err,
                "application listing failed"
            );
        })?;
        Ok(applications)
    }
}
