use serde::{Deserialize, Serialize};

use super::Environment;
use crate::cli::Cli;

/// Where the form API lives for each environment
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base URL used in development
    #[serde(default = "default_development_url")]
    pub development_url: String,

    /// Base URL used in production (required when running in production)
    #[serde(default)]
    pub production_url: Option<String>,

    /// Explicit base URL that wins over both of the above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_override: Option<String>,
}

fn default_development_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            development_url: default_development_url(),
            production_url: None,
            url_override: None,
        }
    }
}

impl ApiSettings {
    /// Merge CLI arguments into this config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Cli) {
        if cli.api_url.is_some() {
            self.url_override = cli.api_url.clone();
        }
    }

    /// Base URL for both schema fetches and submissions.
    pub fn base_url(&self, environment: Environment) -> Option<&str> {
        if let Some(url) = self.url_override.as_deref() {
            return Some(url);
        }
        match environment {
            Environment::Development => Some(self.development_url.as_str()),
            Environment::Production => self.production_url.as_deref(),
        }
    }

    pub fn validate(&self, environment: Environment) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(url) = &self.url_override {
            check_url("api.url_override", url, &mut errors);
        }
        check_url("api.development_url", &self.development_url, &mut errors);
        match &self.production_url {
            Some(url) => check_url("api.production_url", url, &mut errors),
            None if environment == Environment::Production && self.url_override.is_none() => {
                errors.push("api.production_url is required in production".to_string());
            }
            None => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_url(field: &str, raw: &str, errors: &mut Vec<String>) {
    match reqwest::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(format!("{} must use http or https, got '{}'", field, url.scheme())),
        Err(e) => errors.push(format!("{} is not a valid URL ({}): {}", field, raw, e)),
    }
}
