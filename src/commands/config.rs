use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;
use crate::commands::Output;
use crate::config::{load_config, resolve_api_url, save_api_url, API_URL_ENV};
use crate::error::{ConsoleError, Result};
use crate::util::expand_tilde;

/// The `--config` path, or the default location under the home directory.
pub fn config_path(flag: Option<&str>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(expand_tilde(path)),
        None => crate::config::default_config_path()
            .ok_or_else(|| ConsoleError::Custom("Cannot find home directory".into())),
    }
}

pub fn api_url(flag: Option<&str>, path: &Path) -> String {
    let env = std::env::var(API_URL_ENV).ok();
    resolve_api_url(flag, env.as_deref(), load_config(path).as_ref())
}

pub fn run(action: ConfigAction, api_url_flag: Option<&str>, path: &Path, out: Output) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let url = api_url(api_url_flag, path);
            out.emit(
                &serde_json::json!({"configPath": path.display().to_string(), "apiUrl": url}),
                || format!("Config file: {}\nAPI URL:     {url}", path.display()),
            );
        }
        ConfigAction::SetUrl { url } => {
            let saved = save_api_url(path, &url)?;
            out.emit(&saved, || format!("Saved API URL to {}", path.display()));
        }
    }
    Ok(())
}
