//! Store configuration — schema and JSON file loading.
//!
//! # Usage
//! ```no_run
//! use std::path::Path;
//! use filesession::{config, FileSessionPersistence};
//!
//! let cfg = config::load_config(Path::new("/etc/app/sessions.json"));
//! let store = FileSessionPersistence::from_config(&cfg);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, save_config};
pub use schema::PersistenceConfig;
