//! Storage configuration.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const DATA_DIR_ENV: &str = "TUMPUK_DATA_DIR";
pub const FSYNC_ENV: &str = "TUMPUK_FSYNC";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<table>.db` file per table.
    pub data_dir: PathBuf,
    /// Sync every block write to disk.
    pub fsync_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            fsync_enabled: false,
        }
    }
}

impl StorageConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `TUMPUK_DATA_DIR` and `TUMPUK_FSYNC`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = env::var(FSYNC_ENV) {
            config.fsync_enabled = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.db", table_name))
    }
}
