//! Structured error wrapping that survives process boundaries
//!
//! This crate provides the error representation shared by every errtrail
//! consumer:
//! - Error nodes carrying a message, an identity code, key/value pairs and
//!   an optional stack trace tagged with the binary that captured it
//! - Chain traversal and inspection (`walk`, `flatten`, `is`, `codes`, ...)
//! - A wire representation that round-trips the chain across an RPC hop
//! - Per-process stack trace segmentation ("hops") and trace merging
//!
//! ```
//! use errtrail::{chain, wrap, with_code, with_key_value, Error};
//!
//! let not_found = Error::new("record missing", &[with_code("not_found")]);
//! let err = wrap(not_found.clone(), "loading profile", &[with_key_value("user", "42")]);
//!
//! assert_eq!(err.to_string(), "loading profile: record missing");
//! assert_eq!(format!("{err:#}"), "loading profile(user=42): record missing");
//! assert!(chain::is(&err, &not_found));
//! ```

pub mod chain;
pub mod error;
pub mod hop;
pub mod stack;
pub mod trace;
pub mod wire;

pub use error::*;
pub use hop::{Hop, HopError};
pub use stack::{Frame, StackConfig};
pub use wire::{CodecError, WireError, WireHop};
