use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Environment;

/// Intake - tenant-branded lead intake forms
#[derive(Parser, Debug, Clone)]
#[command(name = "intake", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "INTAKE_CONFIG", default_value = "intake.toml", global = true)]
    pub config: PathBuf,

    /// Runtime environment, selects the form API base URL
    #[arg(long, env = "INTAKE_ENVIRONMENT", value_enum, global = true)]
    pub environment: Option<Environment>,

    /// Form API base URL, overrides the environment-derived one
    #[arg(long, env = "INTAKE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Form API server host address
    #[arg(long, env = "INTAKE_HOST", global = true)]
    pub host: Option<String>,

    /// Form API server port
    #[arg(long, env = "INTAKE_PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the configured forms over HTTP (default)
    Serve,
    /// Print a form's schema as served by the API
    Show {
        /// External form identifier
        form_id: String,
    },
    /// Fill in and submit a form from the terminal
    Fill {
        /// External form identifier
        form_id: String,
        /// Pre-filled value, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
        /// Submit the pre-filled values without prompting
        #[arg(long)]
        no_input: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
