use std::collections::HashSet;

use crate::domain::{FormSchema, SubmissionDraft};

use super::rules::FieldRule;
use super::validation::ValidationResult;

pub const NAME_KEY: &str = "name";
pub const PHONE_KEY: &str = "phoneNumber";
pub const EMAIL_KEY: &str = "emailAddress";

/// Minimum length of the visitor's name
pub const NAME_MIN_LEN: usize = 3;

/// One registered form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub rule: FieldRule,
}

/// Ordered set of fields a draft is validated against.
///
/// Order drives both rendering and error reporting.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::default()
    }

    /// Fixed contact fields followed by the schema's custom fields.
    pub fn for_schema(schema: &FormSchema) -> Self {
        let mut builder = Self::builder().contact_fields();
        for key in schema.field_keys() {
            builder = builder.custom(key);
        }
        builder.build()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// A draft with every registered key set to the empty string.
    pub fn empty_draft(&self) -> SubmissionDraft {
        SubmissionDraft::with_keys(self.keys())
    }

    /// Applies each field's rule in registry order.
    ///
    /// Keys in the draft that are not registered are ignored.
    pub fn validate(&self, draft: &SubmissionDraft) -> ValidationResult {
        let mut result = ValidationResult::default();
        for field in &self.fields {
            if let Err(error) = field.rule.check(draft.get(&field.key)) {
                result.push(field.key.clone(), error);
            }
        }
        result
    }
}

#[derive(Debug, Default)]
pub struct FieldRegistryBuilder {
    fields: Vec<FieldSpec>,
    seen: HashSet<String>,
}

impl FieldRegistryBuilder {
    /// Adds `name`, `phoneNumber` and `emailAddress`.
    pub fn contact_fields(self) -> Self {
        self.field(NAME_KEY, "Name", true, FieldRule::MinLength(NAME_MIN_LEN))
            .field(PHONE_KEY, "Phone number", true, FieldRule::Phone)
            .field(EMAIL_KEY, "Email address", true, FieldRule::Email)
    }

    /// Adds an optional free-text field labelled by its key.
    pub fn custom(self, key: &str) -> Self {
        self.field(key, key, false, FieldRule::Any)
    }

    pub fn field(mut self, key: &str, label: &str, required: bool, rule: FieldRule) -> Self {
        if !self.seen.insert(key.to_string()) {
            tracing::warn!("Ignoring duplicate form field key '{}'", key);
            return self;
        }
        self.fields.push(FieldSpec {
            key: key.to_string(),
            label: label.to_string(),
            required,
            rule,
        });
        self
    }

    pub fn build(self) -> FieldRegistry {
        FieldRegistry {
            fields: self.fields,
        }
    }
}
