use intake::adapters::form_api::FormApiState;
use intake::adapters::health_handler::HealthHandler;
use intake::adapters::submission_store::SubmissionStore;
use intake::config::{ApiSettings, Environment, FormConfig, ServerSettings, Settings};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub submissions: SubmissionStore,
}

pub fn test_settings() -> Settings {
    Settings {
        environment: Environment::Development,
        api: ApiSettings::default(),
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        forms: vec![
            FormConfig {
                id: "acme".to_string(),
                name: Some("acme-leads".to_string()),
                company_name: "Acme Plumbing".to_string(),
                description: "Tell us about your project".to_string(),
                fields: vec!["budget".to_string(), "timeline".to_string()],
            },
            FormConfig {
                id: "globex".to_string(),
                name: None,
                company_name: "Globex".to_string(),
                description: String::new(),
                fields: vec![],
            },
        ],
    }
}

/// Router over `test_settings()` plus a handle on its submission store
pub fn test_app() -> (Router, SubmissionStore) {
    let settings = Arc::new(RwLock::new(test_settings()));
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let submissions = SubmissionStore::new();
    let state = FormApiState {
        settings,
        submissions: submissions.clone(),
    };

    (intake::create_app(state, health_handler), submissions)
}

impl TestServer {
    pub async fn new() -> Self {
        let (app, submissions) = test_app();

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            addr,
            base_url,
            submissions,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
