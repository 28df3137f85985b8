//! Client and server interceptors
//!
//! Both sides wrap the transport's own call machinery: the client packs the
//! context's key/values into metadata and converts whatever comes back, the
//! server unpacks them into a [`Context`] for the handler and turns a failed
//! handler into a [`Status`].

use crate::bridge::{from_transport_with, to_status, BoxError};
use crate::config::BridgeConfig;
use crate::context::Context;
use crate::metadata::{decode_key_values, encode_key_values, Metadata};
use crate::status::Status;
use crate::stream::{ClientStream, RawStream, ServerStream};
use errtrail::{with_key_values, Error};
use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// A request as handed to the transport
#[derive(Debug, Clone)]
pub struct Request<T> {
    /// Out-of-band metadata
    pub metadata: Metadata,
    /// Deadline the transport should enforce
    pub deadline: Option<Instant>,
    /// The request message
    pub message: T,
}

impl<T> Request<T> {
    /// Create a request with no metadata and no deadline
    #[must_use]
    pub fn new(message: T) -> Self {
        Self {
            metadata: Metadata::new(),
            deadline: None,
            message,
        }
    }
}

/// Interceptor for the calling side
#[derive(Debug, Clone, Default)]
pub struct ClientInterceptor {
    config: BridgeConfig,
}

impl ClientInterceptor {
    /// Create an interceptor with the given configuration
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Build the outgoing request for `ctx`
    #[must_use]
    pub fn outgoing<T>(&self, ctx: &Context, message: T) -> Request<T> {
        let mut request = Request::new(message);
        encode_key_values(
            &mut request.metadata,
            &self.config.metadata_prefix,
            ctx.key_values(),
        );
        request.deadline = ctx.deadline();
        request
    }

    /// Run a single call through the transport
    ///
    /// # Errors
    ///
    /// Returns the transport's failure converted into an [`Error`].
    pub async fn unary<T, R, F, Fut>(&self, ctx: &Context, message: T, call: F) -> Result<R, Error>
    where
        F: FnOnce(Request<T>) -> Fut,
        Fut: Future<Output = Result<R, BoxError>>,
    {
        let request = self.outgoing(ctx, message);
        call(request).await.map_err(|e| {
            let err = from_transport_with(e, &self.config);
            debug!(error = %err, "unary call failed");
            err
        })
    }

    /// Open a streaming call through the transport
    ///
    /// # Errors
    ///
    /// Returns the transport's failure to open the stream converted into an
    /// [`Error`].
    pub async fn stream<S, F, Fut>(&self, ctx: &Context, open: F) -> Result<ClientStream<S>, Error>
    where
        S: RawStream,
        F: FnOnce(Request<()>) -> Fut,
        Fut: Future<Output = Result<S, BoxError>>,
    {
        let request = self.outgoing(ctx, ());
        match open(request).await {
            Ok(raw) => Ok(ClientStream::new(raw, self.config.clone())),
            Err(e) => Err(from_transport_with(e, &self.config)),
        }
    }
}

/// Interceptor for the serving side
#[derive(Debug, Clone, Default)]
pub struct ServerInterceptor {
    config: BridgeConfig,
}

impl ServerInterceptor {
    /// Create an interceptor with the given configuration
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Unpack an incoming request into the handler's context and message
    #[must_use]
    pub fn incoming<T>(&self, request: Request<T>) -> (Context, T) {
        let mut ctx = Context::new();
        for (key, value) in decode_key_values(&request.metadata, &self.config.metadata_prefix) {
            ctx = ctx.with_key_value(key, value);
        }
        if let Some(deadline) = request.deadline {
            ctx = ctx.with_deadline(deadline);
        }
        (ctx, request.message)
    }

    /// Convert a handler's error into the status sent back
    ///
    /// With echoing enabled the context's key/values are attached first; that
    /// node also captures a trace if the handler's error has none.
    #[must_use]
    pub fn outgoing_error(&self, ctx: &Context, err: Error) -> Status {
        let err = if self.config.echo_key_values && !ctx.key_values().is_empty() {
            err.wrap("", &[with_key_values(ctx.key_values().iter().cloned())])
        } else {
            err
        };
        debug!(error = %err, "handler failed");
        to_status(&err)
    }

    /// Serve a single call
    ///
    /// # Errors
    ///
    /// Returns the status for the handler's error.
    pub async fn unary<T, R, F, Fut>(&self, request: Request<T>, handler: F) -> Result<R, Status>
    where
        F: FnOnce(Context, T) -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let (ctx, message) = self.incoming(request);
        match handler(ctx.clone(), message).await {
            Ok(response) => Ok(response),
            Err(err) => Err(self.outgoing_error(&ctx, err)),
        }
    }

    /// Serve a streaming call
    ///
    /// # Errors
    ///
    /// Returns the status for the handler's error, which the transport
    /// sends as the stream's terminal condition.
    pub async fn stream<S, F, Fut>(
        &self,
        request: Request<()>,
        raw: S,
        handler: F,
    ) -> Result<(), Status>
    where
        S: RawStream,
        F: FnOnce(ServerStream<S>) -> Fut,
        Fut: Future<Output = Result<(), Error>>,
    {
        let (ctx, ()) = self.incoming(request);
        let stream = ServerStream::new(raw, self.config.clone(), ctx.clone());
        match handler(stream).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.outgoing_error(&ctx, err)),
        }
    }
}
