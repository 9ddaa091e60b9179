use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::error::{LoadError, SubmitError};

pub mod draft;
pub mod lifecycle;

pub use draft::SubmissionDraft;
pub use lifecycle::SubmissionState;

/// A tenant's form definition as served by `GET /api/form/{formId}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Internal form identifier, echoed back but otherwise unused
    pub name: String,
    pub company_name: String,
    pub description: String,
    /// Custom field keys in render order
    pub fields: Vec<CustomField>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub value: String,
}

impl CustomField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FormSchema {
    /// Checks a raw response body against the schema shape.
    pub fn from_value(form_id: &str, body: Value) -> Result<Self, LoadError> {
        serde_json::from_value(body).map_err(|e| LoadError::SchemaMalformed {
            form_id: form_id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Custom field keys in declaration order.
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.value.as_str())
    }
}

/// Source of form definitions.
///
/// Implementations return the raw body so that shape validation happens in one
/// place ([`FormSchema::from_value`]).
#[async_trait]
pub trait SchemaPort: Send + Sync {
    async fn fetch_schema(&self, form_id: &str) -> Result<Value, LoadError>;
}

/// Sink for completed drafts.
#[async_trait]
pub trait SubmissionPort: Send + Sync {
    async fn submit(&self, form_id: &str, draft: &SubmissionDraft) -> Result<(), SubmitError>;
}
