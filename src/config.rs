use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConsoleError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8010/api/";
pub const API_URL_ENV: &str = "RCON_API_URL";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_url: None,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rconsole").join("config.json"))
}

/// Reads the config file. A missing or unreadable file yields `None`.
pub fn load_config(path: &Path) -> Option<ConsoleConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring {}: {e}", path.display());
            None
        }
    }
}

pub fn save_api_url(path: &Path, api_url: &str) -> Result<ConsoleConfig> {
    let api_url = api_url.trim();
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(ConsoleError::Validation(format!(
            "API URL must start with http:// or https://: {api_url}"
        )));
    }

    let mut config = load_config(path).unwrap_or_default();
    config.api_url = Some(api_url.to_string());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConsoleError::Custom(e.to_string()))?;
    std::fs::write(path, json)?;

    Ok(config)
}

/// Flag, then environment, then config file, then the default.
pub fn resolve_api_url(
    flag: Option<&str>,
    env: Option<&str>,
    file: Option<&ConsoleConfig>,
) -> String {
    let given = |v: &&str| !v.trim().is_empty();
    flag.filter(given)
        .or(env.filter(given))
        .or_else(|| file.and_then(|c| c.api_url.as_deref()).filter(given))
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}
