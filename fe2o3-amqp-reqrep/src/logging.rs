//! Log output of the binaries

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber on stderr, filtered by `RUST_LOG` and defaulting to `warn`.
///
/// stdout is left to the program output. An already installed global subscriber is kept.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = result {
        debug!(%err, "Keeping the installed subscriber");
    }
}
