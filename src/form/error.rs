//! Error types for loading, validating and submitting intake forms

use thiserror::Error;

use super::validation::ValidationResult;
use crate::domain::lifecycle::{LifecycleError, SubmissionState};

/// Errors raised while resolving a form schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Response body does not have the form schema shape
    #[error("Form '{form_id}' returned a malformed schema: {reason}")]
    SchemaMalformed { form_id: String, reason: String },

    /// Service answered with a non-success status
    #[error("Form '{form_id}' could not be loaded: HTTP {status}")]
    Status { form_id: String, status: u16 },

    /// Request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A single field's validation failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Value is missing or shorter than the required length
    #[error("Must be at least {min_len} characters")]
    Required { min_len: usize },

    /// Value does not have the expected format (e.g. "phone", "email")
    #[error("Invalid {0}")]
    Invalid(String),
}

/// Errors returned from a submit attempt
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Draft failed validation; nothing was sent
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(ValidationResult),

    /// Another submission is still in flight
    #[error("A submission is already in progress")]
    InFlight,

    /// The form was already submitted successfully
    #[error("Form has already been submitted")]
    AlreadySubmitted,

    /// No form is loaded yet
    #[error("Form is not ready")]
    NotReady,

    /// Network or server failure; the draft is preserved
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::SubmissionFailed(err.to_string())
    }
}

impl From<LifecycleError> for SubmitError {
    fn from(err: LifecycleError) -> Self {
        match err.from {
            SubmissionState::Submitted => SubmitError::AlreadySubmitted,
            SubmissionState::Submitting => SubmitError::InFlight,
            SubmissionState::Idle => SubmitError::NotReady,
        }
    }
}
