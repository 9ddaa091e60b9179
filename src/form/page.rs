//! Page controller binding one visitor to one form identifier.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::schema_loader::SchemaLoader;
use crate::domain::{SubmissionPort, SubmissionState};

use super::engine::{FormEngine, SubmitOutcome};
use super::error::{LoadError, SubmitError};

enum PageState {
    Loading,
    Failed(LoadError),
    Ready(Arc<FormEngine>),
}

/// Snapshot of what the page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum PageView {
    /// Indeterminate spinner, nothing else
    Loading,
    Error { message: String },
    Form(FormView),
    Submitted { company_name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub company_name: String,
    pub description: String,
    pub fields: Vec<FieldView>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct IntakePage {
    loader: Arc<SchemaLoader>,
    submitter: Arc<dyn SubmissionPort>,
    form_id: Option<String>,
    state: PageState,
}

impl IntakePage {
    /// `form_id` may be absent while the caller is still resolving it.
    pub fn new(
        loader: Arc<SchemaLoader>,
        submitter: Arc<dyn SubmissionPort>,
        form_id: Option<String>,
    ) -> Self {
        Self {
            loader,
            submitter,
            form_id,
            state: PageState::Loading,
        }
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    /// Resolves the schema and builds the engine.
    ///
    /// Does nothing without a form identifier or once an engine exists.
    pub async fn load(&mut self) {
        if matches!(self.state, PageState::Ready(_)) {
            return;
        }
        let Some(form_id) = self.form_id.clone() else {
            debug!("No form identifier yet, staying in loading state");
            return;
        };

        self.state = match self.loader.load(Some(&form_id)).await {
            Ok(Some(schema)) => {
                PageState::Ready(Arc::new(FormEngine::new(form_id, schema, self.submitter.clone())))
            }
            Ok(None) => PageState::Loading,
            Err(e) => PageState::Failed(e),
        };
    }

    /// Points the page at another form. The contract is only rebuilt when the
    /// identifier actually changes.
    pub async fn rebind(&mut self, form_id: Option<String>) {
        if form_id == self.form_id {
            return;
        }
        if let PageState::Ready(engine) = &self.state {
            engine.unmount();
        }
        self.form_id = form_id;
        self.state = PageState::Loading;
        self.load().await;
    }

    pub fn engine(&self) -> Option<&Arc<FormEngine>> {
        match &self.state {
            PageState::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.state {
            PageState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub async fn set_field(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SubmitError> {
        let engine = self.engine().ok_or(SubmitError::NotReady)?;
        engine.set_field(key, value).await
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let engine = self.engine().ok_or(SubmitError::NotReady)?;
        engine.submit().await
    }

    pub async fn view(&self) -> PageView {
        let engine = match &self.state {
            PageState::Loading => return PageView::Loading,
            PageState::Failed(e) => {
                return PageView::Error {
                    message: e.to_string(),
                }
            }
            PageState::Ready(engine) => engine,
        };

        let schema = engine.schema();
        let lifecycle = engine.lifecycle().await;
        if lifecycle == SubmissionState::Submitted {
            return PageView::Submitted {
                company_name: schema.company_name.clone(),
            };
        }

        let draft = engine.draft().await;
        let errors = engine.errors().await;
        let fields = engine
            .registry()
            .fields()
            .iter()
            .map(|field| FieldView {
                key: field.key.clone(),
                label: field.label.clone(),
                required: field.required,
                value: draft.get(&field.key).to_string(),
                error: errors.get(&field.key).map(|e| e.to_string()),
            })
            .collect();

        PageView::Form(FormView {
            company_name: schema.company_name.clone(),
            description: schema.description.clone(),
            fields,
            submitting: lifecycle == SubmissionState::Submitting,
        })
    }

    /// The visitor navigated away; late responses are dropped.
    pub fn unmount(&self) {
        if let PageState::Ready(engine) = &self.state {
            engine.unmount();
        }
    }
}
