//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus distributes events, it does not store them. Delivery is
//! best-effort broadcast: every live subscriber gets a copy of every
//! published message, in publish order.

use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to a stream of published messages.
///
/// Intended for single-threaded consumption; hand each subscription to one
/// consumer.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Receive without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<M> {
        let mut out = Vec::new();
        while let Ok(m) = self.receiver.try_recv() {
            out.push(m);
        }
        out
    }
}

/// Transport-agnostic event bus.
///
/// `Send + Sync` so a UI layer may consume subscriptions from another
/// thread while the single logical writer publishes.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug;

    /// Broadcast `message` to all current subscribers.
    fn publish(&self, message: M) -> Result<(), Self::Error>;

    /// Open a new subscription receiving everything published from now on.
    fn subscribe(&self) -> Subscription<M>;
}
