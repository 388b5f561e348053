//! Utility helpers — domain-name checks and timestamp handling.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// File extension for session files.
pub const SESSION_EXTENSION: &str = "session";

/// Check that a domain name maps to exactly one file inside the storage dir.
///
/// Rejects empty names, `.`/`..`, path separators and NUL.
pub fn validate_domain(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| c == '/' || c == '\\' || c == '\0');
    if bad {
        return Err(Error::InvalidDomain(name.to_string()));
    }
    Ok(())
}

/// File name for a domain, e.g. `"test"` → `"test.session"`.
pub fn session_file_name(domain: &str) -> String {
    format!("{}.{}", domain, SESSION_EXTENSION)
}

/// Drop sub-millisecond precision.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}
