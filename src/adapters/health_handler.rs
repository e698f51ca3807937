use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Agent service the served UI talks to
    pub api_base_url: String,
}

pub struct HealthHandler {
    api_base_url: String,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if the UI server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            api_base_url: self.api_base_url.clone(),
        };

        (StatusCode::OK, Json(status))
    }
}
