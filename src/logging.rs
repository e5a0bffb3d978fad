//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "streamchat=debug"
    } else {
        "streamchat=info"
    }
}

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Logs go to stderr so they never interleave with the reply printed on
/// stdout. Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
