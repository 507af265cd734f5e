//! Utilities for logging messages from the library.

use once_cell::sync::Lazy;

/// Prints a diagnostic line if logging is enabled for the session.
///
/// The first argument is a [`Session`](crate::Session); the rest are the same as for
/// `println!`.
#[doc(hidden)]
#[macro_export]
macro_rules! safesvg_log {
    (
        $session:expr,
        $($arg:tt)+
    ) => {
        if $session.log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}

/// Whether the `SAFESVG_LOG` environment variable is set.
///
/// The variable is only read once per process.
pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os("SAFESVG_LOG").is_some());

    *ENABLED
}
