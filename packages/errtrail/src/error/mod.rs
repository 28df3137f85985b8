//! Error nodes with codes, key/values and stack traces
//!
//! Provides the structured error type and everything needed to build it:
//! - Leaf, wrapped and joined nodes
//! - Construction options applied in order
//! - Plain and detailed rendering
//! - Extension traits and macros for call sites
//! - Structured logging of a whole chain

pub mod constructors;
pub mod display;
pub mod extensions;
pub mod logging;
pub mod macros;
pub mod options;
pub mod types;

pub use constructors::{join, wrap, wrap_opt};
pub use extensions::{OptionExt, ResultExt};
pub use logging::LoggingTransformer;
pub use options::{
    c, with_code, with_key_value, with_key_value_bytes, with_key_values, with_stack_trace,
    without_trace, Opt,
};
pub use types::{Error, Link, Result};
