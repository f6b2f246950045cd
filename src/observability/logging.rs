//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, at startup
//! - Respect `RUST_LOG` over the configured default
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level configurable via config and environment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `default_directives` applies when `RUST_LOG` is unset, e.g.
/// `"weft=debug,tower_http=debug"`.
pub fn init_logging(default_directives: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
