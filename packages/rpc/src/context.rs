//! Request context and the cancellation/deadline sentinels
//!
//! A [`Context`] travels with one logical request: the key/values that
//! should follow it across calls, an optional deadline and a cancellation
//! token. The two sentinels are the local errors a canceled or timed-out
//! call is reported as.

use errtrail::{c, Error};
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Code of the cancellation sentinel
pub const CANCELED_CODE: &str = "canceled";

/// Code of the deadline sentinel
pub const DEADLINE_EXCEEDED_CODE: &str = "deadline_exceeded";

static CANCELED: Lazy<Error> = Lazy::new(|| Error::new("context canceled", &[c(CANCELED_CODE)]));

static DEADLINE_EXCEEDED: Lazy<Error> =
    Lazy::new(|| Error::new("context deadline exceeded", &[c(DEADLINE_EXCEEDED_CODE)]));

/// The local cancellation sentinel
#[must_use]
pub fn canceled() -> &'static Error {
    &CANCELED
}

/// The local deadline sentinel
#[must_use]
pub fn deadline_exceeded() -> &'static Error {
    &DEADLINE_EXCEEDED
}

/// Context passed along with a request
#[derive(Debug, Clone, Default)]
pub struct Context {
    key_values: Vec<(String, String)>,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl Context {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value that follows the request
    #[must_use]
    pub fn with_key_value(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.key_values.push((key.into(), value.to_string()));
        self
    }

    /// Set an absolute deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Use an existing cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Key/values in insertion order
    #[must_use]
    pub fn key_values(&self) -> &[(String, String)] {
        &self.key_values
    }

    /// The deadline, if any
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Get remaining time until deadline
    #[must_use]
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Check if the deadline has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// The request's cancellation token
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel the request
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the request was canceled
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The sentinel describing why this request should stop, if it should
    ///
    /// Cancellation takes precedence over an expired deadline.
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        if self.is_canceled() {
            Some(canceled().clone())
        } else if self.is_expired() {
            Some(deadline_exceeded().clone())
        } else {
            None
        }
    }
}
