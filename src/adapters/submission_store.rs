use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::SubmissionDraft;

/// A lead received by the form API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub id: Uuid,
    pub form_id: String,
    pub submitted_at: DateTime<Utc>,
    pub values: SubmissionDraft,
}

/// In-memory submissions, kept per form in arrival order.
#[derive(Clone, Default)]
pub struct SubmissionStore {
    submissions: Arc<RwLock<HashMap<String, Vec<StoredSubmission>>>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, form_id: &str, values: SubmissionDraft) -> StoredSubmission {
        let submission = StoredSubmission {
            id: Uuid::new_v4(),
            form_id: form_id.to_string(),
            submitted_at: Utc::now(),
            values,
        };
        let mut submissions = self.submissions.write().await;
        submissions
            .entry(form_id.to_string())
            .or_default()
            .push(submission.clone());
        submission
    }

    pub async fn list(&self, form_id: &str) -> Vec<StoredSubmission> {
        let submissions = self.submissions.read().await;
        submissions.get(form_id).cloned().unwrap_or_default()
    }

    pub async fn count(&self, form_id: &str) -> usize {
        let submissions = self.submissions.read().await;
        submissions.get(form_id).map(Vec::len).unwrap_or(0)
    }

    pub async fn clear(&self) {
        let mut submissions = self.submissions.write().await;
        submissions.clear();
    }
}
