//! `.github/aynorica-config.json` and host-side settings.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, RegistryError};
use crate::registry::config_path_at;

pub const DEFAULT_PARENT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE_NAME: &str = "aynorica-brain";
pub const DEFAULT_SYNC_DEBOUNCE: Duration = Duration::from_millis(5000);

/// Node-local network configuration. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default)]
    pub parent_branch: Option<String>,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    #[serde(default)]
    pub name: Option<String>,
}

impl NetworkConfig {
    /// Parent branch to rebase onto; empty strings fall back to `main`.
    pub fn parent_branch(&self) -> &str {
        self.parent_branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_PARENT_BRANCH)
    }

    /// Remote to fetch from; empty strings fall back to `aynorica-brain`.
    pub fn remote_name(&self) -> &str {
        self.remote
            .as_ref()
            .and_then(|r| r.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_REMOTE_NAME)
    }

    /// `{remote}/{parentBranch}`: the rebase target.
    pub fn upstream(&self) -> String {
        format!("{}/{}", self.remote_name(), self.parent_branch())
    }
}

/// Load `<root>/.github/aynorica-config.json`.
///
/// Returns `RegistryError::ConfigNotFound` if absent,
/// `RegistryError::Parse` if malformed JSON.
pub fn load_config_at(root: &Path) -> Result<NetworkConfig, RegistryError> {
    let path = config_path_at(root);
    if !path.exists() {
        return Err(RegistryError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|source| RegistryError::Parse { path, source })
}

/// Editor-side options: auto-sync prompt on save, and its debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionSettings {
    pub auto_sync_on_save: bool,
    pub sync_debounce: Duration,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            auto_sync_on_save: false,
            sync_debounce: DEFAULT_SYNC_DEBOUNCE,
        }
    }
}

impl ExtensionSettings {
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.sync_debounce = Duration::from_millis(ms);
        self
    }
}
