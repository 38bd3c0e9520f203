//! Log subscriber setup for binaries embedding the client

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ClientConfig;

/// Install a `fmt` subscriber filtered by `config.log`
///
/// `RUST_LOG` wins when set. Returns `false` if a global subscriber was
/// already installed.
pub fn init_tracing(config: &ClientConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).try_init().is_ok()
}
