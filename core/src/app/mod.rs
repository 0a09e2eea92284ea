//! Application shell: configuration, logging and the windowed event loop

pub mod config;
pub mod event_loop;

pub use config::Config;
pub use event_loop::{BridgeApp, GraphicsFactory, run};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; defaults to `info`, which includes module diagnostics.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
