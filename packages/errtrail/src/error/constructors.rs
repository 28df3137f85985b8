//! Error constructors and accessors

use super::options::Opt;
use super::types::{Error, ErrorInner, Link};
use crate::{chain, stack};
use std::any::Any;
use std::panic::Location;
use std::sync::Arc;

impl Error {
    /// Create a new leaf error
    ///
    /// Captures a stack trace and the current binary name unless an option
    /// such as [`without_trace`](super::without_trace) drops it. Options
    /// apply in the order given.
    #[track_caller]
    #[must_use]
    pub fn new(message: impl Into<String>, opts: &[Opt]) -> Self {
        let mut inner = ErrorInner::bare(message.into(), Link::Leaf);
        inner.source = Some(call_site(Location::caller()));
        inner.capture_trace();
        inner.apply(opts);
        inner.into()
    }

    /// Adopt any error value
    ///
    /// Library errors are returned as-is. Anything else becomes a leaf
    /// holding the rendered message and the original value; no trace is
    /// captured here, the first [`wrap`] does that.
    #[must_use]
    pub fn from_std<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Some(own) = (&err as &dyn Any).downcast_ref::<Error>() {
            return own.clone();
        }
        let mut inner = ErrorInner::bare(err.to_string(), Link::Leaf);
        inner.original = Some(Arc::new(err));
        inner.into()
    }

    /// Adopt a boxed error, as transports usually hand them out
    #[must_use]
    pub fn from_boxed(err: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        match err.downcast::<Error>() {
            Ok(own) => *own,
            Err(foreign) => {
                let mut inner = ErrorInner::bare(foreign.to_string(), Link::Leaf);
                inner.original = Some(Arc::from(foreign));
                inner.into()
            }
        }
    }

    /// Wrap this error in a new node
    ///
    /// A trace is captured only when nothing in this chain carries one yet
    /// (or [`with_stack_trace`](super::with_stack_trace) is passed).
    #[track_caller]
    #[must_use]
    pub fn wrap(self, message: impl Into<String>, opts: &[Opt]) -> Self {
        let needs_trace = !chain::has_stack_trace(&self);
        let link = match self.bare_branches() {
            Some(branches) => Link::Joined(branches.to_vec()),
            None => Link::Wrapped(self),
        };
        let mut inner = ErrorInner::bare(message.into(), link);
        inner.source = Some(call_site(Location::caller()));
        if needs_trace {
            inner.capture_trace();
        }
        inner.apply(opts);
        inner.into()
    }

    /// The message of this node only
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// The code of this node only, empty when unset
    #[must_use]
    pub fn code(&self) -> &str {
        &self.inner.code
    }

    /// Key/values attached to this node, in insertion order
    #[must_use]
    pub fn key_values(&self) -> &[(String, String)] {
        &self.inner.key_values
    }

    /// Stack trace captured on this node, innermost frame first
    #[must_use]
    pub fn stack_trace(&self) -> &[String] {
        &self.inner.stack_trace
    }

    /// Binary that captured this node's stack trace
    #[must_use]
    pub fn binary(&self) -> Option<&str> {
        self.inner.binary.as_deref()
    }

    /// `file:line` where this node was constructed
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.inner.source.as_deref()
    }

    /// What this node wraps
    #[must_use]
    pub fn link(&self) -> &Link {
        &self.inner.link
    }

    /// The foreign error this node was adopted from, if any
    #[must_use]
    pub fn original(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.original.as_deref()
    }

    /// Whether this node stands in for a non-library error
    #[must_use]
    pub fn is_foreign(&self) -> bool {
        self.inner.original.is_some()
    }

    /// Whether both handles point at the very same node
    #[must_use]
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Branches of a join that carries nothing of its own
    fn bare_branches(&self) -> Option<&[Error]> {
        let inner = &self.inner;
        match &inner.link {
            Link::Joined(branches)
                if inner.message.is_empty()
                    && inner.code.is_empty()
                    && inner.key_values.is_empty()
                    && inner.stack_trace.is_empty() =>
            {
                Some(branches)
            }
            _ => None,
        }
    }
}

impl ErrorInner {
    fn capture_trace(&mut self) {
        self.stack_trace = stack::capture(0);
        self.binary = Some(stack::binary_name().to_string());
    }

    fn apply(&mut self, opts: &[Opt]) {
        for opt in opts {
            match opt {
                Opt::Code(code) => self.code.clone_from(code),
                Opt::WithoutTrace => self.clear_trace(),
                Opt::WithTrace => {
                    if self.stack_trace.is_empty() {
                        self.capture_trace();
                    }
                }
                Opt::KeyValue(key, value) => self.key_values.push((key.clone(), value.clone())),
                Opt::KeyValues(pairs) => self.key_values.extend(pairs.iter().cloned()),
                Opt::Static(code) => {
                    self.code.clone_from(code);
                    self.clear_trace();
                }
            }
        }
    }

    fn clear_trace(&mut self) {
        self.stack_trace.clear();
        self.binary = None;
    }
}

/// Wrap any error with a message
///
/// Library errors keep their structure; foreign errors are adopted via
/// [`Error::from_std`] and get a fresh stack trace.
#[track_caller]
#[must_use]
pub fn wrap<E>(inner: E, message: impl Into<String>, opts: &[Opt]) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::from_std(inner).wrap(message, opts)
}

/// Wrap an optional error, `None` in gives `None` out
#[track_caller]
#[must_use]
pub fn wrap_opt<E>(inner: Option<E>, message: impl Into<String>, opts: &[Opt]) -> Option<Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match inner {
        Some(inner) => Some(wrap(inner, message, opts)),
        None => None,
    }
}

/// Join independent errors into one branching node
///
/// Returns `None` for an empty input. Wrapping the result with a message
/// yields a node that carries the branches itself.
#[must_use]
pub fn join<I>(errors: I) -> Option<Error>
where
    I: IntoIterator<Item = Error>,
{
    let branches: Vec<Error> = errors.into_iter().collect();
    if branches.is_empty() {
        return None;
    }
    Some(ErrorInner::bare(String::new(), Link::Joined(branches)).into())
}

/// Build a node without capturing anything, used by the wire decoder
pub(crate) fn assemble(
    message: String,
    link: Link,
    code: String,
    key_values: Vec<(String, String)>,
    binary: Option<String>,
    stack_trace: Vec<String>,
    source: Option<String>,
) -> Error {
    ErrorInner {
        message,
        link,
        code,
        key_values,
        binary,
        stack_trace,
        source,
        original: None,
    }
    .into()
}

fn call_site(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}
