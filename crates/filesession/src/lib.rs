//! File-backed persistence for web session state.
//!
//! A session manager hands [`FileSessionPersistence`] the full map of live
//! sessions for one deployment (a *domain*) on shutdown, and asks for it back
//! on startup. Each domain is one file, `<storage_dir>/<domain>.session`.
//! Sessions whose expiration has passed are dropped on load.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use chrono::{Duration, Utc};
//! use filesession::{AnyType, FileSessionPersistence, SessionRecord};
//!
//! let store = FileSessionPersistence::new("/var/lib/app/sessions");
//!
//! let mut sessions = HashMap::new();
//! sessions.insert(
//!     "abc".to_string(),
//!     SessionRecord::new(Utc::now() + Duration::minutes(30)).with_attribute("user", "alice"),
//! );
//! store.persist_sessions("shop", &sessions)?;
//!
//! let restored = store.load_session_attributes("shop", &AnyType)?;
//! assert!(restored.is_some());
//! # Ok::<(), filesession::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod types;
pub mod utils;

pub use context::{AnyType, DeserializationContext, TypeRegistry};
pub use error::{Error, Result};
pub use store::FileSessionPersistence;
pub use types::{AttributeValue, SessionMap, SessionRecord};
