//! Document store abstraction shared by the job and application resources.
//!
//! Components only see [`DocumentCollection`]: insert a record, read every record back. Identifier
//! generation belongs to the store, so a freshly inserted record comes back as a
//! [`StoredRecord`] carrying its [`RecordId`].

mod memory;
mod mongo;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::StorageConfig;

pub use memory::{MemoryCollection, MemoryStore};
pub use mongo::{MongoCollection, MongoStore};

/// Storage-generated identifier, rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidRecordId> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidRecordId(raw.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for RecordId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a 24 character hex identifier")]
pub struct InvalidRecordId(pub String);

/// An entity shape persisted as one document per record.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Model name used in validation messages.
    const MODEL: &'static str;
    const COLLECTION: &'static str;
    /// Fields holding a [`RecordId`] pointing at another collection.
    const REFERENCE_FIELDS: &'static [&'static str] = &[];
}

/// A persisted record together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store refused the document because of its shape.
    #[error("{0}")]
    Rejected(String),
    /// The store could not be reached or failed for reasons unrelated to the document.
    #[error("{0}")]
    Unavailable(String),
}

/// Insert and read-all over one collection of records.
#[async_trait]
pub trait DocumentCollection<T: Record>: Send + Sync {
    async fn insert(&self, record: T) -> Result<StoredRecord<T>, StoreError>;

    /// Every record in storage-native order.
    async fn find_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError>;
}

/// Connection owned by the process bootstrap and handed to each component.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Memory(MemoryStore),
    Mongo(MongoStore),
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    pub async fn connect(config: &StorageConfig) -> Result<Self, StoreError> {
        match config.mongo_uri.as_deref() {
            Some(uri) => {
                let store = MongoStore::connect(uri, config.database.as_deref()).await?;
                Ok(Self::Mongo(store))
            }
            None => Ok(Self::in_memory()),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Mongo(_) => "mongodb",
        }
    }

    pub fn collection<T: Record>(&self) -> Arc<dyn DocumentCollection<T>> {
        match self {
            Self::Memory(store) => Arc::new(store.collection::<T>()),
            Self::Mongo(store) => Arc::new(store.collection::<T>()),
        }
    }
}
