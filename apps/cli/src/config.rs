use std::{fs, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "classifier.toml";
const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub fn load_settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = match file.map(|raw| toml::from_str::<Settings>(raw)) {
        Some(Ok(mut parsed)) => {
            if parsed.request_timeout_secs == 0 {
                warn!(file = SETTINGS_FILE, "ignoring zero request timeout");
                parsed.request_timeout_secs = Settings::default().request_timeout_secs;
            }
            parsed
        }
        Some(Err(err)) => {
            warn!(error = %err, file = SETTINGS_FILE, "ignoring unreadable settings file");
            Settings::default()
        }
        None => Settings::default(),
    };

    if let Some(v) = env("CLASSIFIER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(secs) = env("APP__REQUEST_TIMEOUT_SECS").and_then(|v| parse_timeout(&v)) {
        settings.request_timeout_secs = secs;
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    settings
}

/// Applies command-line flags on top of loaded settings. A zero timeout
/// would fail every request, so it keeps the previous value.
pub fn apply_overrides(settings: &mut Settings, server_url: Option<&str>, timeout_secs: Option<u64>) {
    if let Some(url) = server_url {
        settings.server_url = normalize_server_url(url);
    }
    match timeout_secs {
        Some(0) => warn!("ignoring zero request timeout"),
        Some(secs) => settings.request_timeout_secs = secs,
        None => {}
    }
}

fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

pub fn normalize_server_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    if raw.contains("://") {
        return raw.to_string();
    }
    format!("http://{raw}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
