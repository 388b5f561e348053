//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default storage directory, relative to the working directory.
pub const DEFAULT_STORAGE_DIR: &str = "sessions";

/// Settings for a [`FileSessionPersistence`](crate::FileSessionPersistence).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistenceConfig {
    /// Directory holding `<domain>.session` files. Must already exist.
    pub storage_dir: PathBuf,
    /// fsync each session file after it is written.
    pub sync_on_persist: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            sync_on_persist: false,
        }
    }
}
