//! In-memory transport shared by the integration tests
//!
//! Statuses cross the "wire" as bytes, metadata keys arrive in hash order
//! and an expired deadline is rejected before the handler runs, the way a
//! real transport would.

#![allow(dead_code)]

use async_trait::async_trait;
use errtrail::Error;
use errtrail_rpc::{BoxError, Context, RawStream, Request, ServerInterceptor, Status};
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc;

/// Encode and decode a status as the transport would
pub fn relay(status: Status) -> BoxError {
    let bytes = status.to_bytes().expect("status encodes");
    Box::new(Status::from_bytes(&bytes).expect("status decodes"))
}

/// Deliver a unary request to `handler` behind `server`
pub async fn unary<T, R, F, Fut>(
    server: &ServerInterceptor,
    request: Request<T>,
    handler: F,
) -> Result<R, BoxError>
where
    F: FnOnce(Context, T) -> Fut,
    Fut: Future<Output = Result<R, Error>>,
{
    if request.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
        return Err(Box::new(Status::deadline_exceeded(
            "context deadline exceeded",
        )));
    }
    server.unary(request, handler).await.map_err(relay)
}

enum Frame<T> {
    Message(T),
    Fail(Status),
}

/// One end of an in-memory stream
pub struct Pipe<O, I> {
    tx: mpsc::UnboundedSender<Frame<O>>,
    rx: mpsc::UnboundedReceiver<Frame<I>>,
}

/// Connected client and server ends
pub fn pipe<A, B>() -> (Pipe<A, B>, Pipe<B, A>) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    (
        Pipe { tx: a_tx, rx: b_rx },
        Pipe { tx: b_tx, rx: a_rx },
    )
}

impl<O, I> Pipe<O, I> {
    /// Queue a message for the peer
    pub fn send_message(&self, message: O) {
        let _ = self.tx.send(Frame::Message(message));
    }

    /// Next message from the peer, `None` once it is gone or failed
    pub async fn recv_message(&mut self) -> Option<I> {
        match self.rx.recv().await? {
            Frame::Message(message) => Some(message),
            Frame::Fail(_) => None,
        }
    }

    /// Terminate the peer's stream with `status`
    pub fn fail(&self, status: Status) {
        let _ = self.tx.send(Frame::Fail(status));
    }

    /// Hand out a sender that can terminate the peer's stream later
    pub fn failer(&self) -> Failer<O> {
        Failer {
            tx: self.tx.clone(),
        }
    }
}

/// Terminates a stream from outside its owner
pub struct Failer<O> {
    tx: mpsc::UnboundedSender<Frame<O>>,
}

impl<O> Failer<O> {
    /// Terminate the peer's stream with `status`
    pub fn fail(&self, status: Status) {
        let _ = self.tx.send(Frame::Fail(status));
    }
}

#[async_trait]
impl<O, I> RawStream for Pipe<O, I>
where
    O: Send + 'static,
    I: Send + 'static,
{
    type Outbound = O;
    type Inbound = I;

    async fn send(&mut self, message: O) -> Result<(), BoxError> {
        self.tx
            .send(Frame::Message(message))
            .map_err(|_| Box::new(Status::canceled("stream closed")) as BoxError)
    }

    async fn recv(&mut self) -> Result<Option<I>, BoxError> {
        match self.rx.recv().await {
            Some(Frame::Message(message)) => Ok(Some(message)),
            Some(Frame::Fail(status)) => Err(relay(status)),
            None => Ok(None),
        }
    }
}
