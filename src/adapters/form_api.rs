//! REST handlers for the bundled form API
//!
//! Serves configured tenant forms and accepts submissions for them. Incoming
//! drafts are checked with the same field registry the client uses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::submission_store::{StoredSubmission, SubmissionStore};
use crate::config::Settings;
use crate::domain::SubmissionDraft;
use crate::form::registry::FieldRegistry;
use crate::form::validation::ValidationResult;

/// Shared application state for form API handlers
#[derive(Clone)]
pub struct FormApiState {
    pub settings: Arc<RwLock<Settings>>,
    pub submissions: SubmissionStore,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationResult>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(errors: ValidationResult) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl From<&StoredSubmission> for SubmissionReceipt {
    fn from(s: &StoredSubmission) -> Self {
        Self {
            id: s.id,
            submitted_at: s.submitted_at,
        }
    }
}

fn form_not_found(form_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(format!("Form '{}' not found", form_id))),
    )
        .into_response()
}

/// GET /api/form/:form_id - Form schema
pub async fn get_form(
    State(state): State<FormApiState>,
    Path(form_id): Path<String>,
) -> Response {
    let settings = state.settings.read().await;

    match settings.form(&form_id) {
        Some(form) => (StatusCode::OK, Json(form.to_schema())).into_response(),
        None => form_not_found(&form_id),
    }
}

/// POST /api/form/:form_id - Submit a lead
pub async fn submit_form(
    State(state): State<FormApiState>,
    Path(form_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let schema = {
        let settings = state.settings.read().await;
        match settings.form(&form_id) {
            Some(form) => form.to_schema(),
            None => return form_not_found(&form_id),
        }
    };

    let Some(object) = body.as_object() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<()>::error("Submission body must be a JSON object")),
        )
            .into_response();
    };

    let mut draft = SubmissionDraft::new();
    for (key, value) in object {
        match value.as_str() {
            Some(s) => draft.set(key.clone(), s),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::<()>::error(format!(
                        "Field '{}' must be a string",
                        key
                    ))),
                )
                    .into_response();
            }
        }
    }

    let result = FieldRegistry::for_schema(&schema).validate(&draft);
    if !result.is_valid() {
        debug!("Rejected submission for form '{}': {} invalid field(s)", form_id, result.len());
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<()>::invalid(result)),
        )
            .into_response();
    }

    let stored = state.submissions.record(&form_id, draft).await;
    info!("Received submission {} for form '{}'", stored.id, form_id);

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(SubmissionReceipt::from(&stored))),
    )
        .into_response()
}

/// GET /api/form/:form_id/submissions - Received submissions
pub async fn list_submissions(
    State(state): State<FormApiState>,
    Path(form_id): Path<String>,
) -> Response {
    if state.settings.read().await.form(&form_id).is_none() {
        return form_not_found(&form_id);
    }

    let submissions = state.submissions.list(&form_id).await;
    (StatusCode::OK, Json(ApiResponse::success(submissions))).into_response()
}
