//! pricefill library
//!
//! Exposes the catalog, fetcher, cache and driver for the binary and for
//! integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod driver;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Logs go to stderr so stdout carries only the per-pair report lines.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
