//! Tracing setup
//!
//! Logs go to stderr so a host drawing on stdout is not disturbed.

use tracing_subscriber::EnvFilter;

use crate::{RuntimeError, RuntimeResult};

/// Filter used when neither an explicit filter nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the filter: explicit directive, else `RUST_LOG`, else `info`
pub fn build_filter(directive: Option<&str>) -> RuntimeResult<EnvFilter> {
    match directive {
        Some(directive) => {
            EnvFilter::try_new(directive).map_err(|e| RuntimeError::Logging(e.to_string()))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Install the global subscriber. Fails if one is already installed
pub fn init_tracing(directive: Option<&str>, json: bool) -> RuntimeResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(directive)?)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| RuntimeError::Logging(e.to_string()))
}
