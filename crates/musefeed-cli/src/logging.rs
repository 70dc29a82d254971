// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Musefeed CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! musefeed feed
//!
//! # Debug output for troubleshooting
//! RUST_LOG=musefeed=debug musefeed feed --force
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging subsystem.
///
/// The `RUST_LOG` environment variable controls tracing output. Logs go to
/// stderr so structured stdout output stays parseable.
pub fn init_logging() {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // Default filter: warnings from our crates, errors from the HTTP stack
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("musefeed=warn,reqwest=error"))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
