//! Tracing subscriber setup.

use replicate_proxy_types::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber at `level`.
///
/// `RUST_LOG`, when set, wins over `level`. Safe to call once per
/// invocation: only the first call in a process installs anything.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logger initialized at level {}", level);
    }
}
