//! HTTP client for the form API
//!
//! Both the schema fetch and the submission go to `{base}/api/form/{formId}`
//! on the same environment-derived base URL.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{SchemaPort, SubmissionDraft, SubmissionPort};
use crate::form::error::{LoadError, SubmitError};

#[derive(Clone)]
pub struct FormApiClient {
    client: Client,
    base_url: String,
}

impl FormApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn form_url(&self, form_id: &str) -> String {
        format!("{}/api/form/{}", self.base_url, urlencoding::encode(form_id))
    }
}

#[async_trait]
impl SchemaPort for FormApiClient {
    async fn fetch_schema(&self, form_id: &str) -> Result<Value, LoadError> {
        let url = self.form_url(form_id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                form_id: form_id.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LoadError::SchemaMalformed {
                form_id: form_id.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl SubmissionPort for FormApiClient {
    async fn submit(&self, form_id: &str, draft: &SubmissionDraft) -> Result<(), SubmitError> {
        let url = self.form_url(form_id);
        debug!("POST {} ({} fields)", url, draft.len());

        let response = self.client.post(&url).json(draft).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Form API rejected submission for '{}': {} {}", form_id, status, body);
        Err(SubmitError::SubmissionFailed(format!("HTTP {}", status.as_u16())))
    }
}
