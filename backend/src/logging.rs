//! Log setup.
//!
//! Domain code logs through the `log` macros; the fmt subscriber installed here
//! also picks up those records. `RUST_LOG` takes precedence over the
//! configured level.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Calling it again is harmless.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("Logging initialised at '{}'", default_level);
    }
}
