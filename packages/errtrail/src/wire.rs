//! Wire representation of error chains
//!
//! Maps an error tree onto plain serde messages that can cross a process
//! boundary, and back. Structure is kept for library errors; a foreign
//! error is reduced to its rendered message.
//!
//! Byte encoding uses bincode's standard configuration. Decoding rejects
//! payloads over [`MAX_WIRE_BYTES`] and trees nested deeper than
//! [`MAX_WIRE_DEPTH`] with [`CodecError::Decode`].

use crate::error::constructors::assemble;
use crate::error::{Error, Link};
use crate::hop::{Hop, HopError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Largest payload [`WireError::from_bytes`] and [`hops_from_bytes`] accept
pub const MAX_WIRE_BYTES: usize = 4 * 1024 * 1024;

/// Deepest wrap/join nesting a decoded tree may have
pub const MAX_WIRE_DEPTH: usize = 128;

/// One error node on the wire
///
/// `wrapped_error` and `joined_errors` are mutually exclusive: a joined
/// node fills only `joined_errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Node message
    pub message: String,
    /// Identity code, empty when unset
    pub code: String,
    /// Call site, empty when unknown
    pub source: String,
    /// Binary that captured `stack_trace`
    pub binary: String,
    /// Captured frames
    pub stack_trace: Vec<String>,
    /// Key/values in insertion order
    pub key_values: Vec<WireKeyValue>,
    /// The single wrapped error
    #[serde(deserialize_with = "nesting::wrapped")]
    pub wrapped_error: Option<Box<WireError>>,
    /// Branches of a joined error
    #[serde(deserialize_with = "nesting::joined")]
    pub joined_errors: Vec<WireError>,
}

/// A key/value pair on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireKeyValue {
    /// Key
    pub key: String,
    /// Value
    pub value: String,
}

/// One hop on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHop {
    /// Binary that captured `stack_trace`
    pub binary: String,
    /// Captured frames
    pub stack_trace: Vec<String>,
    /// Errors contributed in that binary
    pub errors: Vec<WireHopError>,
}

/// One hop entry on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHopError {
    /// Identity code
    pub code: String,
    /// Message
    pub message: String,
    /// Call site
    pub source: String,
    /// Key/values
    pub parameters: Vec<WireKeyValue>,
}

/// Failures of the byte encoding
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The message could not be encoded
    #[error("wire encode failed: {0}")]
    Encode(String),

    /// The bytes are not a valid message
    #[error("wire decode failed: {0}")]
    Decode(String),

    /// A message decoded but did not use all of the input
    #[error("wire decode left {0} trailing byte(s)")]
    TrailingBytes(usize),
}

/// Encode an error tree
#[must_use]
pub fn to_wire(err: &Error) -> WireError {
    if err.is_foreign() {
        return WireError {
            message: err.message().to_string(),
            ..WireError::default()
        };
    }

    let mut msg = WireError {
        message: err.message().to_string(),
        code: err.code().to_string(),
        source: err.location().unwrap_or_default().to_string(),
        binary: err.binary().unwrap_or_default().to_string(),
        stack_trace: err.stack_trace().to_vec(),
        key_values: err.key_values().iter().map(WireKeyValue::from).collect(),
        ..WireError::default()
    };
    match err.link() {
        Link::Leaf => {}
        Link::Wrapped(inner) => msg.wrapped_error = Some(Box::new(to_wire(inner))),
        Link::Joined(branches) => msg.joined_errors = branches.iter().map(to_wire).collect(),
    }
    msg
}

/// Encode an optional error, `None` in gives `None` out
pub fn to_wire_opt<'a>(err: impl Into<Option<&'a Error>>) -> Option<WireError> {
    err.into().map(to_wire)
}

/// Decode an error tree
///
/// No stack trace is captured; the node carries exactly what was sent.
#[must_use]
pub fn from_wire(msg: WireError) -> Error {
    let link = if !msg.joined_errors.is_empty() {
        Link::Joined(msg.joined_errors.into_iter().map(from_wire).collect())
    } else if let Some(wrapped) = msg.wrapped_error {
        Link::Wrapped(from_wire(*wrapped))
    } else {
        Link::Leaf
    };
    assemble(
        msg.message,
        link,
        msg.code,
        msg.key_values.into_iter().map(|kv| (kv.key, kv.value)).collect(),
        non_empty(msg.binary),
        msg.stack_trace,
        non_empty(msg.source),
    )
}

/// Decode an optional message
pub fn from_wire_opt(msg: Option<WireError>) -> Option<Error> {
    msg.map(from_wire)
}

impl WireError {
    /// Encode to bytes
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if bincode rejects the message.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Decode from bytes
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the bytes are not exactly one message.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode(bytes)
    }
}

/// Encode a hop list to bytes
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if bincode rejects the hops.
pub fn hops_to_bytes(hops: &[Hop]) -> Result<Vec<u8>, CodecError> {
    let wire: Vec<WireHop> = hops.iter().map(WireHop::from).collect();
    encode(&wire)
}

/// Decode a hop list from bytes
///
/// # Errors
///
/// Returns [`CodecError`] if the bytes are not exactly one hop list.
pub fn hops_from_bytes(bytes: &[u8]) -> Result<Vec<Hop>, CodecError> {
    let wire: Vec<WireHop> = decode(bytes)?;
    Ok(wire.into_iter().map(Hop::from).collect())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CodecError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.len() > MAX_WIRE_BYTES {
        return Err(CodecError::Decode(format!(
            "payload of {} bytes exceeds the {MAX_WIRE_BYTES} byte limit",
            bytes.len()
        )));
    }
    let config = bincode::config::standard().with_limit::<MAX_WIRE_BYTES>();
    let (value, read) = bincode::serde::decode_from_slice(bytes, config)
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    if read != bytes.len() {
        return Err(CodecError::TrailingBytes(bytes.len() - read));
    }
    Ok(value)
}

/// Depth-limited deserialization of the recursive fields
mod nesting {
    use super::{WireError, MAX_WIRE_DEPTH};
    use serde::de::{Deserialize, Deserializer};
    use std::cell::Cell;

    thread_local! {
        static DEPTH: Cell<usize> = const { Cell::new(0) };
    }

    /// One level of nesting, released on drop
    struct Level;

    impl Level {
        fn enter<E: serde::de::Error>() -> Result<Self, E> {
            DEPTH.with(|depth| {
                let next = depth.get() + 1;
                if next > MAX_WIRE_DEPTH {
                    return Err(E::custom(format!(
                        "error tree nested deeper than {MAX_WIRE_DEPTH} levels"
                    )));
                }
                depth.set(next);
                Ok(Level)
            })
        }
    }

    impl Drop for Level {
        fn drop(&mut self) {
            DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
        }
    }

    pub(super) fn wrapped<'de, D>(deserializer: D) -> Result<Option<Box<WireError>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let _level = Level::enter::<D::Error>()?;
        Option::deserialize(deserializer)
    }

    pub(super) fn joined<'de, D>(deserializer: D) -> Result<Vec<WireError>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let _level = Level::enter::<D::Error>()?;
        Vec::deserialize(deserializer)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<&(String, String)> for WireKeyValue {
    fn from((key, value): &(String, String)) -> Self {
        Self {
            key: key.clone(),
            value: value.clone(),
        }
    }
}

impl From<&Hop> for WireHop {
    fn from(hop: &Hop) -> Self {
        Self {
            binary: hop.binary.clone(),
            stack_trace: hop.stack_trace.clone(),
            errors: hop
                .errors
                .iter()
                .map(|e| WireHopError {
                    code: e.code.clone(),
                    message: e.message.clone(),
                    source: e.source.clone(),
                    parameters: e.parameters.iter().map(WireKeyValue::from).collect(),
                })
                .collect(),
        }
    }
}

impl From<WireHop> for Hop {
    fn from(hop: WireHop) -> Self {
        Self {
            binary: hop.binary,
            stack_trace: hop.stack_trace,
            errors: hop
                .errors
                .into_iter()
                .map(|e| HopError {
                    code: e.code,
                    message: e.message,
                    source: e.source,
                    parameters: e.parameters.into_iter().map(|kv| (kv.key, kv.value)).collect(),
                })
                .collect(),
        }
    }
}
