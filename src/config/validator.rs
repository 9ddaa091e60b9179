use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::{FormConfig, ServerSettings, Settings};
use crate::form::registry::{EMAIL_KEY, NAME_KEY, PHONE_KEY};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_forms(&settings.forms) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_forms(forms: &[FormConfig]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, form) in forms.iter().enumerate() {
            if let Some(prev_idx) = seen_ids.insert(&form.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Form id '{}' appears at indices {} and {}",
                    form.id, prev_idx, idx
                )));
            }

            if form.id.is_empty() {
                errors.push(ValidationError::MissingField(format!("forms[{}].id", idx)));
            }

            if form.company_name.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "forms[{}].company_name",
                    idx
                )));
            }

            let mut seen_fields = HashSet::new();
            for (field_idx, key) in form.fields.iter().enumerate() {
                let field = format!("forms[{}].fields[{}]", idx, field_idx);
                if key.is_empty() {
                    errors.push(ValidationError::MissingField(field));
                } else if [NAME_KEY, PHONE_KEY, EMAIL_KEY].contains(&key.as_str()) {
                    errors.push(ValidationError::InvalidValue {
                        field,
                        reason: format!("'{}' is a built-in contact field", key),
                    });
                } else if !seen_fields.insert(key) {
                    errors.push(ValidationError::Duplicate(format!(
                        "Field '{}' appears more than once in form '{}'",
                        key, form.id
                    )));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
