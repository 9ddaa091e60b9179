//! # Intake - tenant-branded lead intake forms
//!
//! A visitor opens a link keyed by a form identifier, sees the tenant's
//! branding and a form made of three fixed contact fields plus the tenant's
//! own custom fields, submits it and gets a confirmation.
//!
//! ## Features
//!
//! - **Schema loading**: per-identifier cache, one outstanding fetch per form
//! - **Dynamic validation**: field registry built at runtime from the schema
//! - **Guarded lifecycle**: `idle → submitting → submitted`, no double submits
//! - **Form API**: bundled HTTP service serving configured forms
//! - **Environment-driven base URL**: development vs production, overridable
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intake::adapters::{form_client::FormApiClient, schema_loader::SchemaLoader};
//! use intake::form::IntakePage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(FormApiClient::new("http://localhost:8080"));
//!     let loader = Arc::new(SchemaLoader::new(client.clone()));
//!
//!     let mut page = IntakePage::new(loader, client, Some("acme".to_string()));
//!     page.load().await;
//!     page.set_field("name", "Alice").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: schema, draft and lifecycle types plus the ports
//! - **Form**: field registry, validation, engine and page controller
//! - **Adapters**: HTTP client, schema loader, form API handlers
//! - **Config**: settings, environment selection and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod render;

use crate::adapters::form_api::{self, FormApiState};
use crate::adapters::health_handler::HealthHandler;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Creates the Axum router for the form API.
///
/// # Arguments
///
/// * `state` - Configured forms and the submission store
/// * `health_handler` - Health check handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(state: FormApiState, health_handler: Arc<HealthHandler>) -> Router {
    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route("/form/:form_id", get(form_api::get_form).post(form_api::submit_form))
        .route("/form/:form_id/submissions", get(form_api::list_submissions))
        .with_state(state);

    health_router.nest("/api", api_router).layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
