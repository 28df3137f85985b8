//! Conversion between errtrail errors and transport statuses
//!
//! Outbound, an error becomes a [`Status`] whose category reflects the
//! cancellation and deadline sentinels and whose details carry the encoded
//! error tree and hop list. Inbound, whatever the transport returned is
//! turned back into an [`Error`]; a decoded remote tree gets a fresh
//! boundary node so this process's part of the trace forms its own hop.

use crate::config::BridgeConfig;
use crate::context::{canceled, deadline_exceeded};
use crate::status::{Code, Status, ERROR_TYPE_URL, HOPS_TYPE_URL};
use errtrail::wire::{self, WireError};
use errtrail::{chain, hop, with_key_value, with_stack_trace, CodecError, Error, Hop};
use tracing::{debug, warn};

/// Error type transports hand out
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A status detail that is present but unusable
#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    /// The payload did not decode
    #[error("invalid {type_url} detail: {source}")]
    Invalid {
        /// Type URL of the bad detail
        type_url: &'static str,
        /// Why decoding failed
        #[source]
        source: CodecError,
    },
}

/// Status category for an outgoing error
#[must_use]
pub fn status_code(err: &Error) -> Code {
    if chain::is(err, canceled()) {
        Code::Canceled
    } else if chain::is(err, deadline_exceeded()) {
        Code::DeadlineExceeded
    } else {
        Code::Unknown
    }
}

/// Convert an outgoing error into a transport status
///
/// A detail that fails to encode is logged and left out; the status is
/// returned with whatever could be attached.
#[must_use]
pub fn to_status(err: &Error) -> Status {
    let mut status = Status::new(status_code(err), chain::message(err));

    match wire::to_wire(err).to_bytes() {
        Ok(bytes) => status = status.with_detail(ERROR_TYPE_URL, bytes),
        Err(e) => warn!(error = %e, "dropping error detail from outgoing status"),
    }
    match wire::hops_to_bytes(&hop::hops(err)) {
        Ok(bytes) => status = status.with_detail(HOPS_TYPE_URL, bytes),
        Err(e) => warn!(error = %e, "dropping hops detail from outgoing status"),
    }

    status
}

/// Decode the error tree carried by a status
///
/// # Errors
///
/// Returns [`DetailError`] if the detail is present but does not decode.
pub fn error_detail(status: &Status) -> Result<Option<Error>, DetailError> {
    let Some(detail) = status.detail(ERROR_TYPE_URL) else {
        return Ok(None);
    };
    let msg = WireError::from_bytes(&detail.value).map_err(|source| DetailError::Invalid {
        type_url: ERROR_TYPE_URL,
        source,
    })?;
    Ok(Some(wire::from_wire(msg)))
}

/// Decode the hop list carried by a status
///
/// # Errors
///
/// Returns [`DetailError`] if the detail is present but does not decode.
pub fn hops_detail(status: &Status) -> Result<Option<Vec<Hop>>, DetailError> {
    let Some(detail) = status.detail(HOPS_TYPE_URL) else {
        return Ok(None);
    };
    wire::hops_from_bytes(&detail.value)
        .map(Some)
        .map_err(|source| DetailError::Invalid {
            type_url: HOPS_TYPE_URL,
            source,
        })
}

/// Convert a transport error with the default configuration
#[must_use]
pub fn from_transport(err: BoxError) -> Error {
    from_transport_with(err, &BridgeConfig::default())
}

/// Convert a transport error into an errtrail error
///
/// Anything that is not a [`Status`] is adopted and wrapped with a fresh
/// trace; a library error passes through unchanged.
#[must_use]
pub fn from_transport_with(err: BoxError, config: &BridgeConfig) -> Error {
    match err.downcast::<Status>() {
        Ok(status) => from_status_with(*status, config),
        Err(other) => {
            let adopted = Error::from_boxed(other);
            if adopted.is_foreign() {
                adopted.wrap("", &[with_stack_trace()])
            } else {
                adopted
            }
        }
    }
}

/// Convert a status with the default configuration
#[must_use]
pub fn from_status(status: Status) -> Error {
    from_status_with(status, &BridgeConfig::default())
}

/// Convert a status into an errtrail error
#[must_use]
pub fn from_status_with(status: Status, config: &BridgeConfig) -> Error {
    match error_detail(&status) {
        Ok(Some(remote)) => {
            debug!(code = %status.code, "decoded remote error");
            if config.capture_boundary_trace {
                remote.wrap("", &[with_stack_trace()])
            } else {
                remote
            }
        }
        Ok(None) => match status.code {
            Code::Canceled | Code::DeadlineExceeded => {
                let sentinel = if status.code == Code::Canceled {
                    canceled()
                } else {
                    deadline_exceeded()
                };
                sentinel
                    .clone()
                    .wrap(status.message, &[with_key_value("code", status.code.name())])
            }
            _ => Error::from_std(status).wrap("", &[with_stack_trace()]),
        },
        Err(reason) => {
            warn!(error = %reason, "remote error detail did not decode");
            Error::from_std(status).wrap(
                "",
                &[with_stack_trace(), with_key_value("decode_error", reason)],
            )
        }
    }
}
