//! Session event sources.
//!
//! Every asynchronous producer (terminal input, the caret ticker, network
//! callbacks) submits [`SessionEvent`]s through a cloned [`EventSender`].
//! The session loop is the single consumer and pulls them one at a time from
//! the [`EventBridge`] in arrival order.

use crate::model::Message;
use crossterm::event::KeyEvent;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use tracing::debug;

pub mod network;
pub mod terminal;
pub mod ticker;

pub use network::{MediaDownloads, NetworkProducer};
pub use terminal::{spawn_terminal_reader, TerminalReader};
pub use ticker::spawn_ticker;

/// Event consumed by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Key press forwarded from the terminal.
    Key(KeyEvent),
    /// Terminal resized to `width` x `height` cells.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// Live message from the network (or a synthetic call notice).
    Incoming(Message),
    /// Caret blink tick.
    Tick,
}

/// Create a connected sender/bridge pair.
pub fn event_bridge() -> (EventSender, EventBridge) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventBridge { rx })
}

/// Producer handle; clone one per producer thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<SessionEvent>,
}

impl EventSender {
    /// Enqueue an event without waiting for it to be processed.
    ///
    /// Returns `false` when the consumer is gone. Never blocks.
    pub fn submit(&self, event: SessionEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(mpsc::SendError(event)) => {
                debug!(?event, "Session loop gone, dropping event");
                false
            }
        }
    }
}

/// Single-consumer end of the event stream.
#[derive(Debug)]
pub struct EventBridge {
    rx: Receiver<SessionEvent>,
}

impl EventBridge {
    /// Block until the next event arrives.
    ///
    /// Returns `None` once every [`EventSender`] has been dropped and the
    /// queue is drained.
    pub fn next_event(&self) -> Option<SessionEvent> {
        self.rx.recv().ok()
    }

    /// Wait at most `timeout` for the next event.
    pub fn next_event_timeout(&self, timeout: Duration) -> Option<SessionEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take the next queued event, if any, without blocking.
    pub fn try_next_event(&self) -> Option<SessionEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
