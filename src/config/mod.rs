use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;
use crate::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Where the agent service lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    pub base_url: String,
}

/// Address the `serve` command binds to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiSettings {
    /// Built UI bundle on disk; the embedded bundle is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_file(Path::new("studio.toml"))
    }

    /// Load settings, applying CLI overrides last (CLI > env vars > config file)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::from_file(&cli.config)?;
        settings.apply_cli_overrides(cli);
        Ok(settings)
    }

    pub fn from_file(config_path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("STUDIO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if let Some(serve) = cli.serve_args() {
            if let Some(host) = &serve.host {
                self.server.host = host.clone();
            }
            if let Some(port) = serve.port {
                self.server.port = port;
            }
            if let Some(dir) = &serve.ui_dir {
                self.ui.dir = Some(dir.clone());
            }
        }
    }
}
