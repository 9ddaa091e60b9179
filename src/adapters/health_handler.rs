use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Settings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub forms: usize,
}

pub struct HealthHandler {
    settings: Arc<RwLock<Settings>>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(settings: Arc<RwLock<Settings>>) -> Self {
        Self {
            settings,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let forms = self.settings.read().await.forms.len();
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            forms,
        };

        (StatusCode::OK, Json(status))
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "alive",
                "message": "Server is alive"
            })),
        )
    }
}
