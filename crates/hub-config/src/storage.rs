//! Document store (libSQL) configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "hub.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Local database file. `:memory:` keeps everything in-process.
    #[serde(default = "default_path")]
    pub path: String,

    /// Whether to seed the showcase catalogue into an empty store.
    #[serde(default = "default_seed")]
    pub seed_catalogue: bool,
}

const fn default_seed() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            seed_catalogue: default_seed(),
        }
    }
}

impl StorageConfig {
    pub fn is_configured(&self) -> bool {
        !self.path.trim().is_empty()
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
