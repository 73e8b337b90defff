use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{PayloadReader, SchemaError};
use crate::store::{Record, RecordId};

/// An application to a job posting.
///
/// `job_id` is a loose reference: it must look like an identifier but is never checked against
/// the jobs collection. `resume` holds a URL and is stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(rename = "jobID", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<RecordId>,
    /// Answers to the posting's questions, in question order.
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Record for Application {
    const MODEL: &'static str = "Application";
    const COLLECTION: &'static str = "applications";
    const REFERENCE_FIELDS: &'static [&'static str] = &["jobID"];
}

impl Application {
    pub fn from_payload(payload: &Value) -> Result<Self, SchemaError> {
        let mut reader = PayloadReader::new(Self::MODEL, payload)?;
        let application = Self {
            name: reader.string("name"),
            email: reader.string("email"),
            phone: reader.string("phone"),
            resume: reader.string("resume"),
            job_id: reader.record_id("jobID"),
            answers: reader.strings("answers"),
            language: reader.string("language"),
        };
        reader.finish()?;
        Ok(application)
    }
}
