//! Error conversion for streaming calls
//!
//! The transport supplies a [`RawStream`]; the wrappers here run every send
//! and receive failure through the same conversion as unary calls, so a
//! cancellation or deadline seen mid-stream reads exactly like one seen on a
//! single call.

use crate::bridge::{from_transport_with, BoxError};
use crate::config::BridgeConfig;
use crate::context::Context;
use async_trait::async_trait;
use errtrail::Error;
use futures::stream::{self, Stream};

/// A transport's stream, one end of a streaming call
#[async_trait]
pub trait RawStream: Send {
    /// Messages this end sends
    type Outbound: Send + 'static;
    /// Messages this end receives
    type Inbound: Send + 'static;

    /// Send one message
    async fn send(&mut self, message: Self::Outbound) -> Result<(), BoxError>;

    /// Receive the next message, `None` once the peer finished
    async fn recv(&mut self) -> Result<Option<Self::Inbound>, BoxError>;
}

/// Client end of a streaming call
pub struct ClientStream<S> {
    inner: S,
    config: BridgeConfig,
}

impl<S: RawStream> ClientStream<S> {
    pub(crate) fn new(inner: S, config: BridgeConfig) -> Self {
        Self { inner, config }
    }

    /// Send one message
    ///
    /// # Errors
    ///
    /// Returns the converted transport error if the send fails.
    pub async fn send(&mut self, message: S::Outbound) -> Result<(), Error> {
        self.inner
            .send(message)
            .await
            .map_err(|e| from_transport_with(e, &self.config))
    }

    /// Receive the next message
    ///
    /// # Errors
    ///
    /// Returns the converted transport error, including the server's
    /// terminal status.
    pub async fn recv(&mut self) -> Result<Option<S::Inbound>, Error> {
        self.inner
            .recv()
            .await
            .map_err(|e| from_transport_with(e, &self.config))
    }

    /// Received messages as a `Stream`, ending after the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<S::Inbound, Error>> {
        stream::unfold(Some(self), |state| async move {
            let mut this = state?;
            match this.recv().await {
                Ok(Some(message)) => Some((Ok(message), Some(this))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    /// The underlying transport stream
    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Server end of a streaming call
pub struct ServerStream<S> {
    inner: S,
    config: BridgeConfig,
    context: Context,
}

impl<S: RawStream> ServerStream<S> {
    pub(crate) fn new(inner: S, config: BridgeConfig, context: Context) -> Self {
        Self {
            inner,
            config,
            context,
        }
    }

    /// The request context unpacked from the call's metadata
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Send one message to the client
    ///
    /// # Errors
    ///
    /// Returns the converted transport error if the send fails.
    pub async fn send(&mut self, message: S::Outbound) -> Result<(), Error> {
        self.inner
            .send(message)
            .await
            .map_err(|e| from_transport_with(e, &self.config))
    }

    /// Receive the next message from the client
    ///
    /// # Errors
    ///
    /// Returns the converted transport error if the receive fails.
    pub async fn recv(&mut self) -> Result<Option<S::Inbound>, Error> {
        self.inner
            .recv()
            .await
            .map_err(|e| from_transport_with(e, &self.config))
    }
}
