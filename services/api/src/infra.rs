use job_board::config::StorageConfig;
use job_board::store::{DocumentStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

/// Operational state shared with the health, readiness and metrics endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) storage_backend: &'static str,
}

/// Opens the document store the components will share for the lifetime of the process.
pub(crate) async fn open_store(
    storage: &StorageConfig,
    in_memory: bool,
) -> Result<DocumentStore, StoreError> {
    if in_memory {
        return Ok(DocumentStore::in_memory());
    }
    if storage.mongo_uri.is_none() {
        warn!("MONGO_URI is not set, records are kept in memory and lost on restart");
    }
    DocumentStore::connect(storage).await
}
