use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::SearchMode;

/// Settings for the whole console. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub sync: SyncSettings,
}

impl ConsoleSettings {
    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.api.base_url,
            debounce_ms = self.search.debounce_ms,
            release_limit = self.sync.release_limit,
            "Loaded ConsoleSettings"
        );
        debug!(?self, "ConsoleSettings loaded (full debug)");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: Some(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub limit: u32,
    pub mode: SearchMode,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            limit: 10,
            mode: SearchMode::Hybrid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub release_limit: u32,
    pub reload_delay_ms: u64,
    /// Used when the server reports no default docs path.
    pub fallback_docs_path: String,
}

impl SyncSettings {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            release_limit: 20,
            reload_delay_ms: 1000,
            fallback_docs_path: "docs".to_string(),
        }
    }
}
