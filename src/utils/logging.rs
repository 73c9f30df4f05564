// Logging setup

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used. Calling this
/// twice returns an error instead of panicking.
pub fn init_logging(default_level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| {
            let error_msg = format!("failed to initialise logging: {}", e);
            eprintln!("{}", error_msg);
            error_msg
        })?;

    info!(level = default_level, "logging initialised");
    Ok(())
}
