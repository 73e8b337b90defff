use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{info, warn};

use super::{DocumentCollection, Record, RecordId, StoredRecord, StoreError};

/// Database used when neither configuration nor the URI names one.
const DEFAULT_DATABASE: &str = "test";
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Builds the client and pings the deployment in the background, so startup never waits on
    /// server selection. An unreachable deployment is logged; individual operations report the
    /// outage when they run.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(unavailable)?;
        options.app_name = Some("job-board".to_string());
        let client = Client::with_options(options).map_err(unavailable)?;

        let database = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        tokio::spawn(ping(database.clone()));

        Ok(Self { database })
    }

    pub fn collection<T: Record>(&self) -> MongoCollection<T> {
        MongoCollection {
            inner: self.database.collection::<Document>(T::COLLECTION),
            _record: PhantomData,
        }
    }
}

async fn ping(database: Database) {
    match database.run_command(doc! { "ping": 1 }).await {
        Ok(_) => info!(database = database.name(), "document store connected"),
        Err(err) => warn!(
            database = database.name(),
            error = %err,
            "document store ping failed, requests will error until it is reachable"
        ),
    }
}

pub struct MongoCollection<T> {
    inner: Collection<Document>,
    _record: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: Record> DocumentCollection<T> for MongoCollection<T> {
    async fn insert(&self, record: T) -> Result<StoredRecord<T>, StoreError> {
        let document = encode::<T>(&record)?;
        let result = self.inner.insert_one(document).await.map_err(classify)?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Unavailable(format!(
                "{} insert returned a non-ObjectId _id: {}",
                T::COLLECTION,
                result.inserted_id
            ))
        })?;

        Ok(StoredRecord {
            id: RecordId::from(id),
            record,
        })
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord<T>>, StoreError> {
        let mut cursor = self.inner.find(doc! {}).await.map_err(classify)?;
        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(classify)? {
            records.push(decode::<T>(document)?);
        }
        Ok(records)
    }
}

/// References are written as ObjectIds so they match documents created by other clients of the
/// same collections.
fn encode<T: Record>(record: &T) -> Result<Document, StoreError> {
    let mut document = bson::to_document(record)
        .map_err(|err| StoreError::Rejected(format!("{} validation failed: {err}", T::MODEL)))?;

    for field in T::REFERENCE_FIELDS {
        let raw = match document.get(*field) {
            Some(Bson::String(raw)) => raw.clone(),
            _ => continue,
        };
        let oid = ObjectId::parse_str(&raw).map_err(|_| {
            StoreError::Rejected(format!(
                "{} validation failed: {field}: Cast to ObjectId failed for value \"{raw}\" at path \"{field}\"",
                T::MODEL
            ))
        })?;
        document.insert(*field, Bson::ObjectId(oid));
    }

    Ok(document)
}

fn decode<T: Record>(mut document: Document) -> Result<StoredRecord<T>, StoreError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => RecordId::from(oid),
        other => {
            return Err(StoreError::Unavailable(format!(
                "{} document has a non-ObjectId _id: {other:?}",
                T::COLLECTION
            )))
        }
    };

    for field in T::REFERENCE_FIELDS {
        let hex = match document.get(*field) {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            _ => continue,
        };
        document.insert(*field, Bson::String(hex));
    }

    let record = bson::from_document(document).map_err(|err| {
        StoreError::Unavailable(format!(
            "failed to decode {} document {id}: {err}",
            T::COLLECTION
        ))
    })?;

    Ok(StoredRecord { id, record })
}

fn classify(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write))
            if write.code == DOCUMENT_VALIDATION_FAILURE =>
        {
            StoreError::Rejected(write.message.clone())
        }
        ErrorKind::BsonSerialization(_) | ErrorKind::InvalidArgument { .. } => {
            StoreError::Rejected(err.to_string())
        }
        _ => unavailable(err),
    }
}

fn unavailable(err: mongodb::error::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
