use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::FieldError;

/// Field errors in registry order. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<(String, FieldError)>,
}

impl ValidationResult {
    pub fn push(&mut self, key: String, error: FieldError) {
        self.errors.push((key, error));
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, e)| (k.as_str(), e))
    }
}

// Serialized as `{ key: message }`, keeping registry order.
impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (key, error) in &self.errors {
            map.serialize_entry(key, &error.to_string())?;
        }
        map.end()
    }
}
