//! Tracing subscriber setup.
//!
//! Hosts usually install their own subscriber; this helper exists for
//! standalone embedders and tests.

use tracing_subscriber::EnvFilter;

use crate::domain::models::config::LoggingConfig;

/// Install a global subscriber honoring the configured level and format.
///
/// `RUST_LOG` overrides the configured level when set. Returns quietly if
/// a subscriber is already installed.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
