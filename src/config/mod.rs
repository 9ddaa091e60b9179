use clap::ValueEnum;
use config::{Config, File};
use serde::{Deserialize, Serialize};

pub mod api;
pub mod validator;

pub use api::ApiSettings;

use crate::cli::Cli;
use crate::domain::{CustomField, FormSchema};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Selects which API base URL is used
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub api: ApiSettings,
    pub server: ServerSettings,
    /// Tenant forms served by `intake serve`
    #[serde(default)]
    pub forms: Vec<FormConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// A tenant's form as configured for the bundled form API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// External identifier used in `/api/form/{id}`
    pub id: String,
    /// Internal name, defaults to the identifier
    #[serde(default)]
    pub name: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    /// Custom field keys in render order
    #[serde(default)]
    pub fields: Vec<String>,
}

impl FormConfig {
    pub fn to_schema(&self) -> FormSchema {
        FormSchema {
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            company_name: self.company_name.clone(),
            description: self.description.clone(),
            fields: self.fields.iter().map(CustomField::new).collect(),
        }
    }
}

impl Settings {
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("intake");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;
        settings.validate()?;

        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(environment) = cli.environment {
            self.environment = environment;
        }
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        self.api.merge_cli(cli);
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;

        self.api.validate(self.environment).map_err(|errors| {
            anyhow::anyhow!("API configuration validation failed:\n{}", errors.join("\n"))
        })
    }

    /// Form API base URL for the current environment.
    pub fn api_base_url(&self) -> Result<&str, anyhow::Error> {
        self.api.base_url(self.environment).ok_or_else(|| {
            anyhow::anyhow!("No form API URL configured for {:?}", self.environment)
        })
    }

    pub fn form(&self, id: &str) -> Option<&FormConfig> {
        self.forms.iter().find(|f| f.id == id)
    }

    fn load_forms_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                            let content = std::fs::read_to_string(&path)?;
                            let form: FormConfig = match ext {
                                "json" => serde_json::from_str(&content)?,
                                "toml" => toml::from_str(&content)?,
                                _ => serde_yaml::from_str(&content)?,
                            };
                            tracing::debug!("Loaded form '{}' from {}", form.id, path.display());
                            self.forms.push(form);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }
}
