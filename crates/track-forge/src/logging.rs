//! Logging setup for the command line application

use tracing_subscriber::prelude::*;

/// Initialize logging.
///
/// If RUST_LOG is not set, a default is installed first: `debug` in debug
/// builds (with noisy HTTP internals at `info`), `info` otherwise.
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            if cfg!(debug_assertions) {
                std::env::set_var(
                    "RUST_LOG",
                    "debug,hyper_util=info,reqwest::connect=info,rustls=info",
                );
            } else {
                std::env::set_var("RUST_LOG", "info");
            }
        }
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    let registry = tracing_subscriber::registry().with(fmt_layer);

    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Logging already initialized: {e}");
        return;
    }

    tracing::debug!(
        "RUST_LOG is {}",
        std::env::var("RUST_LOG").unwrap_or_default()
    );
}
