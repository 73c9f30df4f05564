/*!
 * Application-level error helpers
 *
 * Library seams return the typed errors from `crate::error`; handler code and
 * configuration loading use `anyhow` through the aliases below.
 */

use anyhow::{anyhow, Result as AnyhowResult};

/// Result type used by handlers and the config layer
pub type AppResult<T> = AnyhowResult<T>;

/// Error type used by handlers and the config layer
pub type AppError = anyhow::Error;

// ============================================================================
// Helpers
// ============================================================================

/// Creates a plain application error
pub fn app_error(msg: impl Into<String>) -> AppError {
    anyhow!(msg.into())
}

/// Returns early with an `anyhow` error built from a literal or format string.
#[macro_export]
macro_rules! app_bail {
    ($msg:literal $(,)?) => {
        return Err(anyhow::anyhow!($msg))
    };
    ($err:expr $(,)?) => {
        return Err(anyhow::anyhow!($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err(anyhow::anyhow!($fmt, $($arg)*))
    };
}
