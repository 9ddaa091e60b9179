//! Dynamic form engine
//!
//! Owns one visitor's draft for a loaded schema and drives the submission
//! lifecycle. Only one submission can be in flight; a second `submit` while
//! the first is pending is rejected rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{FormSchema, SubmissionDraft, SubmissionPort, SubmissionState};

use super::error::SubmitError;
use super::registry::FieldRegistry;
use super::validation::ValidationResult;

/// How a submit call that passed the guards ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the server; the engine is now terminal
    Submitted,
    /// The consumer unmounted before the response arrived
    Discarded,
}

struct EngineState {
    draft: SubmissionDraft,
    lifecycle: SubmissionState,
    errors: ValidationResult,
}

pub struct FormEngine {
    form_id: String,
    schema: Arc<FormSchema>,
    registry: FieldRegistry,
    submitter: Arc<dyn SubmissionPort>,
    state: RwLock<EngineState>,
    mounted: AtomicBool,
}

impl FormEngine {
    pub fn new(
        form_id: impl Into<String>,
        schema: Arc<FormSchema>,
        submitter: Arc<dyn SubmissionPort>,
    ) -> Self {
        let registry = FieldRegistry::for_schema(&schema);
        let draft = registry.empty_draft();
        Self {
            form_id: form_id.into(),
            schema,
            registry,
            submitter,
            state: RwLock::new(EngineState {
                draft,
                lifecycle: SubmissionState::Idle,
                errors: ValidationResult::default(),
            }),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn schema(&self) -> &Arc<FormSchema> {
        &self.schema
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub async fn lifecycle(&self) -> SubmissionState {
        self.state.read().await.lifecycle
    }

    pub async fn draft(&self) -> SubmissionDraft {
        self.state.read().await.draft.clone()
    }

    /// Errors surfaced by the last submit attempt, kept up to date as the
    /// offending fields are edited.
    pub async fn errors(&self) -> ValidationResult {
        self.state.read().await.errors.clone()
    }

    /// Validates the current draft without changing any state.
    pub async fn validate(&self) -> ValidationResult {
        let state = self.state.read().await;
        self.registry.validate(&state.draft)
    }

    /// Updates one value. Keys outside the registry are accepted and sent
    /// with the submission.
    pub async fn set_field(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SubmitError> {
        let key = key.into();
        let mut state = self.state.write().await;
        match state.lifecycle {
            SubmissionState::Idle => {}
            SubmissionState::Submitting => return Err(SubmitError::InFlight),
            SubmissionState::Submitted => return Err(SubmitError::AlreadySubmitted),
        }

        state.draft.set(key.clone(), value);

        if state.errors.get(&key).is_some() {
            let fresh = self.registry.validate(&state.draft);
            let mut errors = ValidationResult::default();
            for (k, e) in fresh.iter() {
                if state.errors.get(k).is_some() {
                    errors.push(k.to_string(), e.clone());
                }
            }
            state.errors = errors;
        }
        Ok(())
    }

    /// Validates and sends the draft.
    ///
    /// Invalid drafts never reach the network. On failure the draft is kept
    /// and the engine returns to `Idle` so the visitor can resubmit.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let payload = {
            let mut state = self.state.write().await;
            let next = state.lifecycle.begin_submit().map_err(|e| {
                debug!("Ignoring submit for form '{}': {}", self.form_id, e);
                SubmitError::from(e)
            })?;

            let result = self.registry.validate(&state.draft);
            if !result.is_valid() {
                debug!(
                    "Form '{}' has {} invalid field(s), not submitting",
                    self.form_id,
                    result.len()
                );
                state.errors = result.clone();
                return Err(SubmitError::Invalid(result));
            }

            state.errors = ValidationResult::default();
            state.lifecycle = next;
            state.draft.clone()
        };

        let outcome = self.submitter.submit(&self.form_id, &payload).await;

        if !self.is_mounted() {
            debug!(
                "Discarding submission result for unmounted form '{}'",
                self.form_id
            );
            return Ok(SubmitOutcome::Discarded);
        }

        let mut state = self.state.write().await;
        match outcome {
            Ok(()) => {
                state.lifecycle = state.lifecycle.complete()?;
                state.draft.clear_values();
                info!("Form '{}' submitted", self.form_id);
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) => {
                state.lifecycle = state.lifecycle.fail()?;
                warn!("Submission of form '{}' failed: {}", self.form_id, e);
                Err(e)
            }
        }
    }

    /// Marks the consumer as gone. In-flight results are dropped on arrival.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomField;
    use crate::form::error::FieldError;
    use crate::form::registry::{EMAIL_KEY, NAME_KEY, PHONE_KEY};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records every call; optionally fails or waits for a release signal.
    #[derive(Default)]
    struct RecordingSubmitter {
        calls: AtomicUsize,
        payloads: Mutex<Vec<SubmissionDraft>>,
        fail: AtomicBool,
        gate: Option<Arc<Notify>>,
    }

    impl RecordingSubmitter {
        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubmissionPort for RecordingSubmitter {
        async fn submit(&self, _form_id: &str, draft: &SubmissionDraft) -> Result<(), SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(draft.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                Err(SubmitError::SubmissionFailed("HTTP 500".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn schema() -> Arc<FormSchema> {
        Arc::new(FormSchema {
            name: "demo".to_string(),
            company_name: "Acme".to_string(),
            description: "Talk to sales".to_string(),
            fields: vec![CustomField::new("budget"), CustomField::new("timeline")],
        })
    }

    async fn fill_valid(engine: &FormEngine) {
        engine.set_field(NAME_KEY, "Alice").await.unwrap();
        engine.set_field(PHONE_KEY, "+15551234567").await.unwrap();
        engine.set_field(EMAIL_KEY, "a@b.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_initial_draft_has_every_registered_key() {
        let engine = FormEngine::new("f1", schema(), Arc::new(RecordingSubmitter::default()));
        let draft = engine.draft().await;

        assert_eq!(draft.len(), 5);
        assert!(draft.iter().all(|(_, v)| v.is_empty()));
        assert_eq!(engine.lifecycle().await, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        engine.set_field(NAME_KEY, "Al").await.unwrap();

        let err = engine.submit().await.unwrap_err();
        match err {
            SubmitError::Invalid(result) => {
                assert_eq!(result.keys().collect::<Vec<_>>(), vec![NAME_KEY, PHONE_KEY, EMAIL_KEY]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(submitter.calls(), 0);
        assert_eq!(engine.lifecycle().await, SubmissionState::Idle);
        assert_eq!(engine.errors().await.len(), 3);
    }

    #[tokio::test]
    async fn test_editing_clears_fixed_error() {
        let engine = FormEngine::new("f1", schema(), Arc::new(RecordingSubmitter::default()));
        fill_valid(&engine).await;
        engine.set_field(NAME_KEY, "Al").await.unwrap();
        assert!(engine.submit().await.is_err());
        assert_eq!(
            engine.errors().await.get(NAME_KEY),
            Some(&FieldError::Required { min_len: 3 })
        );

        engine.set_field(NAME_KEY, "Alice").await.unwrap();
        assert!(engine.errors().await.is_empty());
    }

    #[tokio::test]
    async fn test_valid_draft_with_empty_custom_fields_submits() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        fill_valid(&engine).await;

        let outcome = engine.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(submitter.calls(), 1);
        assert_eq!(engine.lifecycle().await, SubmissionState::Submitted);

        // cleared after success
        let draft = engine.draft().await;
        assert_eq!(draft.get(NAME_KEY), "");
        assert_eq!(draft.len(), 5);
    }

    #[tokio::test]
    async fn test_payload_includes_extra_keys() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        fill_valid(&engine).await;
        engine.set_field("budget", "10k").await.unwrap();
        engine.set_field("referrer", "partner-site").await.unwrap();

        engine.submit().await.unwrap();

        let payloads = submitter.payloads.lock().unwrap();
        assert_eq!(payloads[0].get("budget"), "10k");
        assert_eq!(payloads[0].get("referrer"), "partner-site");
        assert_eq!(payloads[0].get("timeline"), "");
    }

    #[tokio::test]
    async fn test_submitted_is_terminal() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        fill_valid(&engine).await;
        engine.submit().await.unwrap();

        assert!(matches!(engine.submit().await, Err(SubmitError::AlreadySubmitted)));
        assert!(matches!(
            engine.set_field(NAME_KEY, "Bob").await,
            Err(SubmitError::AlreadySubmitted)
        ));
        assert_eq!(submitter.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_preserves_draft_and_returns_to_idle() {
        let submitter = Arc::new(RecordingSubmitter::default());
        submitter.fail.store(true, Ordering::SeqCst);
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        fill_valid(&engine).await;
        engine.set_field("budget", "10k").await.unwrap();

        let err = engine.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionFailed(_)));
        assert_eq!(engine.lifecycle().await, SubmissionState::Idle);

        let draft = engine.draft().await;
        assert_eq!(draft.get(NAME_KEY), "Alice");
        assert_eq!(draft.get("budget"), "10k");

        // manual resubmission goes through
        submitter.fail.store(false, Ordering::SeqCst);
        assert_eq!(engine.submit().await.unwrap(), SubmitOutcome::Submitted);
        assert_eq!(submitter.calls(), 2);
    }

    #[tokio::test]
    async fn test_double_submit_sends_once() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(RecordingSubmitter::gated(gate.clone()));
        let engine = Arc::new(FormEngine::new("f1", schema(), submitter.clone()));
        fill_valid(&engine).await;

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.submit().await }
        });

        while engine.lifecycle().await != SubmissionState::Submitting {
            tokio::task::yield_now().await;
        }

        assert!(matches!(engine.submit().await, Err(SubmitError::InFlight)));
        assert!(matches!(
            engine.set_field(NAME_KEY, "Bob").await,
            Err(SubmitError::InFlight)
        ));

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), SubmitOutcome::Submitted);
        assert_eq!(submitter.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submits_send_once() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(RecordingSubmitter::gated(gate.clone()));
        let engine = FormEngine::new("f1", schema(), submitter.clone());
        fill_valid(&engine).await;

        let release = async {
            while submitter.calls() == 0 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        };
        let (a, b, ()) = futures::join!(engine.submit(), engine.submit(), release);

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(SubmitError::InFlight))));
        assert_eq!(submitter.calls(), 1);
    }

    #[tokio::test]
    async fn test_result_after_unmount_is_discarded() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(RecordingSubmitter::gated(gate.clone()));
        let engine = Arc::new(FormEngine::new("f1", schema(), submitter.clone()));
        fill_valid(&engine).await;

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.submit().await }
        });
        while submitter.calls() == 0 {
            tokio::task::yield_now().await;
        }

        engine.unmount();
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Discarded);
        // state untouched by the late response
        assert_eq!(engine.lifecycle().await, SubmissionState::Submitting);
        assert_eq!(engine.draft().await.get(NAME_KEY), "Alice");
    }
}
