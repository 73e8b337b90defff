use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentCollection, Record, RecordId, StoredRecord, StoreError};

type Documents = HashMap<&'static str, Vec<(RecordId, Value)>>;

/// Schemaless in-process store keyed by collection name.
///
/// Collections handed out by the same store share their documents, so a catalog and a test
/// holding separate handles see the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
}

impl MemoryStore {
    pub fn collection<T: Record>(&self) -> MemoryCollection<T> {
        MemoryCollection {
            documents: self.documents.clone(),
            _record: PhantomData,
        }
    }
}

pub struct MemoryCollection<T> {
    documents: Arc<Mutex<Documents>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            _record: PhantomData,
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl<T: Record> DocumentCollection<T> for MemoryCollection<T> {
    async fn insert(&self, record: T) -> Result<StoredRecord<T>, StoreError> {
        let document = serde_json::to_value(&record)
            .map_err(|err| StoreError::Rejected(format!("{} validation failed: {err}", T::MODEL)))?;
        let id = RecordId::generate();

        let mut guard = self.documents.lock().map_err(|_| poisoned())?;
        guard
            .entry(T::COLLECTION)
            .or_default()
            .push((id, document));

        Ok(StoredRecord { id, record })
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        let documents = {
            let guard = self.documents.lock().map_err(|_| poisoned())?;
            guard.get(T::COLLECTION).cloned().unwrap_or_default()
        };

        documents
            .into_iter()
            .map(|(id, document)| {
                let record = serde_json::from_value(document).map_err(|err| {
                    StoreError::Unavailable(format!(
                        "failed to decode {} document {id}: {err}",
                        T::COLLECTION
                    ))
                })?;
                Ok(StoredRecord { id, record })
            })
            .collect()
    }
}
