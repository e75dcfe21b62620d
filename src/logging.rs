use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: only warnings reach the terminal.
pub const DEFAULT_FILTER: &str = "dayplan=warn";

/// Installs the global subscriber, writing to stderr so table output on
/// stdout stays clean. `verbose` raises the crate's level to debug.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dayplan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
