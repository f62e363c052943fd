pub mod commands;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod reference;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` wins; otherwise the default filter, or the
/// debug filter when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        config::verbose_log_filter()
    } else {
        config::default_log_filter()
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}
