//! Core error types and definitions

use std::sync::Arc;

/// Structured error node
///
/// A cheap handle over an immutable node. Cloning shares the node, so a
/// package-level sentinel can be wrapped from many threads at once.
#[derive(Debug, Clone)]
pub struct Error {
    pub(crate) inner: Arc<ErrorInner>,
}

#[derive(Debug)]
pub(crate) struct ErrorInner {
    /// Human-readable message for this layer (may be empty)
    pub message: String,
    /// What this node wraps
    pub link: Link,
    /// Identity code, empty when the node has none
    pub code: String,
    /// Key/values in insertion order
    pub key_values: Vec<(String, String)>,
    /// Binary that captured `stack_trace`
    pub binary: Option<String>,
    /// Formatted frames, innermost first
    pub stack_trace: Vec<String>,
    /// `file:line` of the constructing call site
    pub source: Option<String>,
    /// Foreign error preserved for in-process identity checks
    pub original: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

/// Shape of a node: what, if anything, it wraps
#[derive(Debug, Clone)]
pub enum Link {
    /// Nothing wrapped
    Leaf,
    /// A single wrapped error
    Wrapped(Error),
    /// Independent branches of a joined error, in argument order
    Joined(Vec<Error>),
}

impl ErrorInner {
    pub(crate) fn bare(message: String, link: Link) -> Self {
        Self {
            message,
            link,
            code: String::new(),
            key_values: Vec::new(),
            binary: None,
            stack_trace: Vec::new(),
            source: None,
            original: None,
        }
    }
}

impl From<ErrorInner> for Error {
    fn from(inner: ErrorInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
