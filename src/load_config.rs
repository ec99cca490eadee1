use std::fs;
use std::path::Path;

use anyhow::Result;
use doclib_console_core::config::ConsoleSettings;
use tracing::{error, info};

/// Overrides `api.base_url` when set.
pub const BASE_URL_ENV: &str = "DOCLIB_CONSOLE_BASE_URL";

/// Loads console settings from a YAML file. Missing sections fall back to defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConsoleSettings> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid, all-defaults config.
    let settings: ConsoleSettings = if config_content.trim().is_empty() {
        ConsoleSettings::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(settings) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                settings
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!(
                    "Failed to parse config YAML {:?}: {e}",
                    path_ref
                ));
            }
        }
    };

    Ok(apply_env(settings))
}

/// Settings used when no config file is given.
pub fn default_config() -> ConsoleSettings {
    apply_env(ConsoleSettings::default())
}

fn apply_env(mut settings: ConsoleSettings) -> ConsoleSettings {
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            info!(base_url = %base_url, "API base URL overridden from environment");
            settings.api.base_url = base_url.trim().to_string();
        }
    }
    settings
}
