//! Logging setup for hosts embedding the store.
//!
//! The store itself only emits `tracing` events. Hosts that don't install
//! their own subscriber can call [`init_logging`].

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber.
///
/// `verbose` enables debug output for this crate. Does nothing if a global
/// subscriber is already set.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("filesession=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(true);
        init_logging(false);
        tracing::debug!("logging initialised");
    }
}
