use std::{collections::HashMap, fs};

use shared::protocol::DIAGNOSE_PATH;
use url::Url;

use crate::error::ConfigError;

pub const SETTINGS_FILE: &str = "helpdesk.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub default_username: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            default_username: None,
        }
    }
}

impl Settings {
    /// Resolves the diagnosis endpoint against the configured service origin.
    pub fn diagnose_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.server_url.trim();
        let base = Url::parse(raw).map_err(|source| ConfigError::InvalidServerUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: base.scheme().to_string(),
            });
        }
        base.join(DIAGNOSE_PATH)
            .map_err(|source| ConfigError::InvalidServerUrl {
                url: raw.to_string(),
                source,
            })
    }
}

/// Defaults, then `helpdesk.toml` in the working directory, then environment overrides.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok())
}

fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("server_url") {
                    settings.server_url = v.clone();
                }
                if let Some(v) = file_cfg.get("username") {
                    settings.default_username = Some(v.clone());
                }
            }
            Err(err) => tracing::warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
        }
    }

    let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = non_empty("HELPDESK_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = non_empty("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = non_empty("HELPDESK_USERNAME") {
        settings.default_username = Some(v);
    }
    if let Some(v) = non_empty("APP__USERNAME") {
        settings.default_username = Some(v);
    }

    settings
}
