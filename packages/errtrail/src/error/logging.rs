//! Structured logging of error chains
//!
//! Provides env_logger-based initialisation and helpers that render an
//! error's codes, key/values and per-hop stack traces through the standard
//! `log` crate.

use super::types::Error;
use crate::{chain, hop};
use log::{debug, error, info, warn};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging entry points for errtrail errors
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure levels via `RUST_LOG`, e.g. `RUST_LOG=errtrail_rpc=debug`.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("errtrail logging initialized");
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a failed operation with everything the chain carries
    ///
    /// Emits one `error` record with the rendered chain, codes and
    /// key/values, then one `debug` record per hop with its stack trace.
    pub fn log_error(operation: &str, err: &Error) {
        let codes = chain::codes(err).join(",");
        let pairs = Self::format_key_values(err);
        error!("{operation} failed: {err:#} (codes: [{codes}], key_values: {{{pairs}}})");

        for (index, hop) in hop::hops(err).iter().enumerate() {
            debug!(
                "{operation} hop {index} on {}: {} frame(s), {} error(s)",
                display_binary(&hop.binary),
                hop.stack_trace.len(),
                hop.errors.len()
            );
            for frame in &hop.stack_trace {
                debug!("    {frame}");
            }
        }
    }

    /// Log an error that was handled without failing the operation
    pub fn log_recovered(operation: &str, err: &Error) {
        let pairs = Self::format_key_values(err);
        warn!("{operation} recovered from: {err} (key_values: {{{pairs}}})");
    }

    fn format_key_values(err: &Error) -> String {
        chain::key_values(err)
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn display_binary(binary: &str) -> &str {
    if binary.is_empty() {
        "<unknown>"
    } else {
        binary
    }
}
