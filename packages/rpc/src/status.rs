//! Transport status objects
//!
//! A status is what a failed call hands back across the wire: a category
//! code, a human-readable message and any number of opaque detail payloads
//! identified by type URL.

use errtrail::wire::MAX_WIRE_BYTES;
use errtrail::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type URL of the encoded error tree detail
pub const ERROR_TYPE_URL: &str = "type.errtrail.dev/errtrail.v1.Error";

/// Type URL of the encoded hop list detail
pub const HOPS_TYPE_URL: &str = "type.errtrail.dev/errtrail.v1.Hops";

/// Largest encoded status accepted, room for both details
const MAX_STATUS_BYTES: usize = 2 * MAX_WIRE_BYTES;

/// Status categories
///
/// Carried on the wire as their numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
#[repr(i32)]
pub enum Code {
    /// Not an error
    Ok = 0,
    /// The caller canceled the call
    Canceled = 1,
    /// Any other failure
    Unknown = 2,
    /// The call's deadline passed before it completed
    DeadlineExceeded = 4,
}

impl Code {
    /// Category name as carried in key/values
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Canceled => "Canceled",
            Code::Unknown => "Unknown",
            Code::DeadlineExceeded => "DeadlineExceeded",
        }
    }

    /// Map a numeric status code, unrecognized numbers become `Unknown`
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Canceled,
            4 => Code::DeadlineExceeded,
            _ => Code::Unknown,
        }
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code as i32
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Code::from_i32(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One opaque detail payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    /// Identifies how `value` is encoded
    pub type_url: String,
    /// Encoded payload
    pub value: Vec<u8>,
}

/// A call outcome as seen by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Category
    pub code: Code,
    /// Human-readable message
    pub message: String,
    /// Attached payloads
    pub details: Vec<Detail>,
}

impl Status {
    /// Create a status without details
    #[must_use]
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a canceled status
    #[must_use]
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(Code::Canceled, message)
    }

    /// Create a deadline exceeded status
    #[must_use]
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    /// Create an unknown status
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    /// Attach a detail payload
    #[must_use]
    pub fn with_detail(mut self, type_url: impl Into<String>, value: Vec<u8>) -> Self {
        self.details.push(Detail {
            type_url: type_url.into(),
            value,
        });
        self
    }

    /// First detail with the given type URL
    #[must_use]
    pub fn detail(&self, type_url: &str) -> Option<&Detail> {
        self.details.iter().find(|d| d.type_url == type_url)
    }

    /// Encode to bytes for the transport
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if bincode rejects the status.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode from transport bytes
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the bytes are not exactly one status.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() > MAX_STATUS_BYTES {
            return Err(CodecError::Decode(format!(
                "status of {} bytes exceeds the {MAX_STATUS_BYTES} byte limit",
                bytes.len()
            )));
        }
        let config = bincode::config::standard().with_limit::<MAX_STATUS_BYTES>();
        let (status, read): (Self, usize) = bincode::serde::decode_from_slice(bytes, config)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        if read != bytes.len() {
            return Err(CodecError::TrailingBytes(bytes.len() - read));
        }
        Ok(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Status {}
