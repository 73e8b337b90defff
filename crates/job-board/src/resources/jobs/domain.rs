use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{PayloadReader, SchemaError};
use crate::store::Record;

/// A job posting. Every field is optional; `language` is `"en"` or `"ar"` by convention only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Record for Job {
    const MODEL: &'static str = "Job";
    const COLLECTION: &'static str = "jobs";
}

impl Job {
    /// Copies the recognized fields out of an arbitrary payload.
    pub fn from_payload(payload: &Value) -> Result<Self, SchemaError> {
        let mut reader = PayloadReader::new(Self::MODEL, payload)?;
        let job = Self {
            company_name: reader.string("companyName"),
            job_title: reader.string("jobTitle"),
            job_description: reader.string("jobDescription"),
            requirements: reader.strings("requirements"),
            language: reader.string("language"),
        };
        reader.finish()?;
        Ok(job)
    }
}
