use std::{collections::HashMap, fs};

use serde::Deserialize;

const SETTINGS_FILE: &str = "reelgrid.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".into(),
            api_key: String::new(),
            language: "en-US".into(),
            request_timeout_secs: 15,
        }
    }
}

/// Layered settings: defaults, then the optional `reelgrid.toml` in the
/// working directory, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("TMDB_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Ok(v) = std::env::var("TMDB_API_KEY") {
        settings.api_key = v;
    }
    if let Ok(v) = std::env::var("APP__API_KEY") {
        settings.api_key = v;
    }

    if let Ok(v) = std::env::var("APP__LANGUAGE") {
        settings.language = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("base_url").and_then(|v| v.as_str()) {
        settings.base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("api_key").and_then(|v| v.as_str()) {
        settings.api_key = v.to_string();
    }
    if let Some(v) = file_cfg.get("language").and_then(|v| v.as_str()) {
        settings.language = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(|v| v.as_integer())
    {
        if v > 0 {
            settings.request_timeout_secs = v as u64;
        }
    }
}
