//! Tracks metadata for a validation session.

use crate::log;

/// Metadata for a validation session.
///
/// A [`Validator`](crate::Validator) holds one of these and passes it down to the
/// places that want to log why a document was rejected.
#[derive(Debug, Clone)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    /// Enables logging if the `SAFESVG_LOG` environment variable is set.
    fn default() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }
}

impl Session {
    /// Creates a session with logging explicitly turned on or off.
    pub fn with_logging(log_enabled: bool) -> Self {
        Self { log_enabled }
    }

    /// Creates a session that never logs, regardless of the environment.
    pub fn new_for_test_suite() -> Self {
        Self::with_logging(false)
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}
