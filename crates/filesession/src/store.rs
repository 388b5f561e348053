//! File-backed session persistence — one `.session` file per domain.
//!
//! Lifecycle per domain: absent → `persist_sessions` → present →
//! `persist_sessions` (overwrite) → present → `clear` → absent.
//! `load_session_attributes` only reads.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::context::DeserializationContext;
use crate::error::{Error, Result};
use crate::format;
use crate::types::SessionMap;
use crate::utils;

// ─────────────────────────────────────────────
// FileSessionPersistence
// ─────────────────────────────────────────────

/// Persists session maps as files under a storage directory.
///
/// The directory must already exist. The store holds no locks: callers sharing
/// a domain across threads or processes must serialize access themselves.
#[derive(Clone, Debug)]
pub struct FileSessionPersistence {
    /// Directory where `.session` files are stored.
    storage_dir: PathBuf,
    /// fsync each file after writing.
    sync_on_persist: bool,
}

impl FileSessionPersistence {
    /// Create a store rooted at `storage_dir`.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            sync_on_persist: false,
        }
    }

    /// Create a store from a loaded [`PersistenceConfig`].
    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self {
            storage_dir: config.storage_dir.clone(),
            sync_on_persist: config.sync_on_persist,
        }
    }

    /// Enable or disable fsync after each persist.
    pub fn with_sync_on_persist(mut self, sync: bool) -> Self {
        self.sync_on_persist = sync;
        self
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Path of the file backing `domain`. Does not touch the filesystem.
    pub fn session_file(&self, domain: &str) -> Result<PathBuf> {
        utils::validate_domain(domain)?;
        Ok(self.storage_dir.join(utils::session_file_name(domain)))
    }

    /// Write every session in `sessions` to the domain's file, replacing it.
    ///
    /// An empty map still produces a file.
    pub fn persist_sessions(&self, domain: &str, sessions: &SessionMap) -> Result<()> {
        let path = self.session_file(domain)?;

        let file = File::create(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
                if !self.storage_dir.is_dir() {
                    warn!(dir = %self.storage_dir.display(), "session storage directory does not exist");
                }
                Error::StorageUnavailable {
                    path: path.clone(),
                    source,
                }
            }
            _ => Error::Io {
                path: path.clone(),
                source,
            },
        })?;

        let io_err = |source| Error::Io {
            path: path.clone(),
            source,
        };

        let mut writer = BufWriter::new(file);
        format::encode(&mut writer, domain, sessions, Utc::now()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        if self.sync_on_persist {
            writer.get_ref().sync_all().map_err(io_err)?;
        }

        debug!(
            domain,
            sessions = sessions.len(),
            path = %path.display(),
            "persisted sessions"
        );
        Ok(())
    }

    /// Read back the domain's sessions, dropping those that have expired.
    ///
    /// Returns `Ok(None)` when no file exists. A file holding no live sessions
    /// gives `Ok(Some(empty))`. `context` resolves attribute type names and is
    /// otherwise passed through untouched.
    pub fn load_session_attributes(
        &self,
        domain: &str,
        context: &dyn DeserializationContext,
    ) -> Result<Option<SessionMap>> {
        let path = self.session_file(domain)?;

        let mut file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(domain, path = %path.display(), "no session file");
                return Ok(None);
            }
            Err(source) => return Err(Error::Io { path, source }),
        };

        let mut bytes = Vec::new();
        if let Err(source) = file.read_to_end(&mut bytes) {
            return Err(Error::Io { path, source });
        }
        drop(file);

        let decoded = match format::decode(&bytes, context) {
            Ok(d) => d,
            Err(reason) => return Err(Error::Corrupted { path, reason }),
        };
        if decoded.header.domain != domain {
            warn!(
                domain,
                file_domain = %decoded.header.domain,
                path = %path.display(),
                "session file was written for a different domain"
            );
        }

        let mut sessions = decoded.sessions;
        let total = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, record| !record.is_expired_at(now));

        let expired = total - sessions.len();
        if expired > 0 {
            info!(domain, expired, "discarded expired sessions");
        }
        debug!(
            domain,
            sessions = sessions.len(),
            path = %path.display(),
            "loaded sessions"
        );
        Ok(Some(sessions))
    }

    /// Delete the domain's file. Missing files are not an error.
    pub fn clear(&self, domain: &str) -> Result<()> {
        let path = self.session_file(domain)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(domain, path = %path.display(), "deleted session file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io { path, source }),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
