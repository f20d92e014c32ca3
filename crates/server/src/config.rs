use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::protocol::DEFAULT_TOPIC;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub default_topic: String,
    pub tick_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:4000".into(),
            default_topic: DEFAULT_TOPIC.into(),
            tick_interval_ms: 1000,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    default_topic: Option<String>,
    tick_interval_ms: Option<u64>,
}

/// `RUST_LOG` directives when present and valid, `info` otherwise.
pub fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then `path` if it parses, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.default_topic {
                    settings.default_topic = v;
                }
                if let Some(v) = file_cfg.tick_interval_ms {
                    settings.tick_interval_ms = v;
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__DEFAULT_TOPIC") {
        settings.default_topic = v;
    }

    if let Some(v) = env("APP__TICK_INTERVAL_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.tick_interval_ms = parsed,
            Err(error) => warn!(value = %v, %error, "ignoring invalid APP__TICK_INTERVAL_MS"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
