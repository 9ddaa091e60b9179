use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visitor input keyed by field name.
///
/// The map is open: keys outside the field registry are kept and sent along
/// with the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionDraft {
    values: BTreeMap<String, String>,
}

impl SubmissionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft with every key present and empty.
    pub fn with_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            values: keys
                .into_iter()
                .map(|k| (k.to_string(), String::new()))
                .collect(),
        }
    }

    /// Missing keys read as the empty string.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Empties every value while keeping the keys.
    pub fn clear_values(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionDraft
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_key_reads_empty() {
        let draft = SubmissionDraft::new();
        assert_eq!(draft.get("name"), "");
        assert!(!draft.contains_key("name"));
    }

    #[test]
    fn test_serializes_as_flat_object_with_extras() {
        let mut draft = SubmissionDraft::with_keys(["name", "budget"]);
        draft.set("name", "Alice");
        draft.set("utm_source", "newsletter");

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Alice", "budget": "", "utm_source": "newsletter" })
        );
    }

    #[test]
    fn test_clear_values_keeps_keys() {
        let mut draft: SubmissionDraft = [("name", "Alice"), ("budget", "10k")].into_iter().collect();
        draft.clear_values();

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.get("name"), "");
        assert_eq!(draft.get("budget"), "");
    }
}
