use agent_studio::adapters::ui_handler::RuntimeConfig;
use agent_studio::config::{ApiSettings, LoggingSettings, ServerSettings, Settings, UiSettings};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::util::ServiceExt;

fn settings(ui_dir: Option<PathBuf>) -> Settings {
    Settings {
        api: ApiSettings {
            base_url: "http://agents.internal:8000".to_string(),
        },
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingSettings {
            level: "info".to_string(),
        },
        ui: UiSettings { dir: ui_dir },
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_health() {
    let app = agent_studio::create_app(&settings(None));
    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_base_url"], "http://agents.internal:8000");
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_runtime_config() {
    let app = agent_studio::create_app(&settings(None));
    let (status, body) = get(app, "/studio.json").await;

    assert_eq!(status, StatusCode::OK);
    let config: RuntimeConfig = serde_json::from_str(&body).unwrap();
    assert_eq!(config.api_base_url, "http://agents.internal:8000");
}

#[tokio::test]
async fn test_embedded_ui_falls_back_to_index() {
    let app = agent_studio::create_app(&settings(None));
    let (status, body) = get(app, "/agents/42").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn test_ui_dir_is_served() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("index.html"),
        "<html><body>from disk</body></html>",
    )?;
    fs::write(temp_dir.path().join("app.js"), "console.log('studio');")?;

    let app = agent_studio::create_app(&settings(Some(temp_dir.path().to_path_buf())));
    let (status, body) = get(app.clone(), "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('studio');");

    let (status, body) = get(app, "/chat").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("from disk"));
    Ok(())
}
