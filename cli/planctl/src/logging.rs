//! Tracing setup for the `plan` binary.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `PLAN_LOG` takes an `EnvFilter` directive; `PLAN_LOG_FORMAT=json`
//! switches to JSON lines.

use std::io;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive variable.
pub const LOG_ENV: &str = "PLAN_LOG";

/// Output format variable (`json` or anything else for text).
pub const LOG_FORMAT_ENV: &str = "PLAN_LOG_FORMAT";

/// Directive used when `PLAN_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let json = matches!(std::env::var(LOG_FORMAT_ENV).as_deref(), Ok("json"));

    let json_layer = json.then(|| fmt::layer().json().with_writer(io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
