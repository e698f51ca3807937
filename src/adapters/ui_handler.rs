use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

/// Served as `/studio.json` so the browser bundle learns where the agent
/// service is without being rebuilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: String,
}

pub struct UIHandler;

impl UIHandler {
    pub async fn serve(uri: Uri) -> Response {
        let path = uri.path().trim_start_matches('/');

        let path = if path.is_empty() { "index.html" } else { path };

        match Self::asset(path) {
            Some(response) => response,
            // SPA fallback: the app decides what unknown paths show
            None => Self::asset("index.html")
                .unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response()),
        }
    }

    pub async fn runtime_config(config: RuntimeConfig) -> impl IntoResponse {
        Json(config)
    }

    fn asset(path: &str) -> Option<Response> {
        let content = Asset::get(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Some(([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response())
    }
}
