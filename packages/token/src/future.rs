//! Async result handling for token operations
//!
//! Signing and verification run on tokio's blocking pool and hand their
//! result back through a oneshot channel wrapped in a concrete `Future`.

use crate::error::{TokenError, TokenResult};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Pending result of [`crate::encode_signed`] or [`crate::verify_signed`]
///
/// Created and awaited inside a tokio runtime.
#[must_use = "token operations do nothing unless awaited"]
pub struct AsyncTokenResult<T> {
    receiver: oneshot::Receiver<TokenResult<T>>,
}

impl<T: Send + 'static> AsyncTokenResult<T> {
    /// Run `task` on the blocking pool
    pub(crate) fn spawn<F>(task: F) -> Self
    where
        F: FnOnce() -> TokenResult<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(task());
        });
        Self { receiver: rx }
    }

    /// Already resolved, for failures detected before any work is spawned
    pub(crate) fn ready(result: TokenResult<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }
}

impl<T> Future for AsyncTokenResult<T> {
    type Output = TokenResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TokenError::internal("Token task dropped"))),
            Poll::Pending => Poll::Pending,
        }
    }
}
