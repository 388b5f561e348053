//! Config loader — reads a JSON file, falling back to defaults.

use std::path::Path;
use tracing::{debug, info, warn};

use super::schema::PersistenceConfig;

/// Load configuration from `path`.
///
/// Falls back to `PersistenceConfig::default()` if the file doesn't exist or
/// can't be parsed.
pub fn load_config(path: &Path) -> PersistenceConfig {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return PersistenceConfig::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return PersistenceConfig::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            PersistenceConfig::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &PersistenceConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(path, json)?;
    debug!("Config saved to {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
