//! # Agent Studio - no-code agent builder
//!
//! Create chat agents of four kinds (conversational, document Q&A,
//! tool-calling and coding), chat with them, feed documents to the
//! retrieval agents and manage the tools a tool-calling agent may use.
//! All agent behavior lives in a remote HTTP service; this crate is the
//! client side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_studio::client::{AgentApi, HttpApiClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HttpApiClient::new("http://localhost:8000");
//!     for agent in client.list_agents().await? {
//!         println!("{} {}", agent.id, agent.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: agent types, typed agent configuration, messages, tools
//! - **Controller**: reducer owning the application state; emits effects
//! - **Client**: the agent service API and its reqwest implementation
//! - **Adapters**: axum handlers serving the browser UI
//! - **Config**: configuration management
//!
//! `domain`, `error` and the controller reducer build without the `native`
//! feature and are shared with the browser UI.

#[cfg(feature = "native")]
pub mod adapters;
#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;

#[cfg(feature = "native")]
use crate::adapters::health_handler::HealthHandler;
#[cfg(feature = "native")]
use crate::adapters::ui_handler::{RuntimeConfig, UIHandler};
#[cfg(feature = "native")]
use axum::{routing::get, Router};
#[cfg(feature = "native")]
use std::sync::Arc;

/// Creates the Axum router serving the browser UI.
///
/// `/health` reports liveness, `/studio.json` tells the bundle where the
/// agent service is, and every other path serves the UI: from
/// `settings.ui.dir` when set, otherwise from the bundle embedded at build
/// time, falling back to `index.html` for client-side routes.
#[cfg(feature = "native")]
pub fn create_app(settings: &config::Settings) -> Router {
    let health_handler = Arc::new(HealthHandler::new(settings.api.base_url.clone()));
    let runtime_config = RuntimeConfig {
        api_base_url: settings.api.base_url.clone(),
    };

    let router = Router::new()
        .route(
            "/health",
            get(move || {
                let h = health_handler.clone();
                async move { h.health().await }
            }),
        )
        .route(
            "/studio.json",
            get(move || UIHandler::runtime_config(runtime_config.clone())),
        );

    match &settings.ui.dir {
        Some(dir) => {
            tracing::info!("Serving UI from {}", dir.display());
            let index = tower_http::services::ServeFile::new(dir.join("index.html"));
            router.fallback_service(tower_http::services::ServeDir::new(dir).fallback(index))
        }
        None => router.fallback(UIHandler::serve),
    }
}
