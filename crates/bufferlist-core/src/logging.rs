#![forbid(unsafe_code)]

//! Logging facade.
//!
//! The engine logs through `tracing`. This module re-exports the macros so
//! hosts can log with the same targets, and, with the `tracing-json` feature,
//! installs a JSON subscriber filtered by `RUST_LOG`.
//!
//! ```ignore
//! bufferlist_core::logging::init_json_logging("bufferlist=debug")?;
//! ```

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a global JSON subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Returns an error string
/// when a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_filter: &str) -> Result<(), String> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| format!("invalid log filter: {err}"))?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|err| format!("subscriber already installed: {err}"))
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_error() {
        let _ = init_json_logging("debug");
        assert!(init_json_logging("debug").is_err());
    }
}
