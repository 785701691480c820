//! Caret blink ticker.

use super::{EventSender, SessionEvent};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Spawn a thread that submits [`SessionEvent::Tick`] every `interval`.
///
/// The thread exits once the session loop stops accepting events.
pub fn spawn_ticker(sender: EventSender, interval: Duration) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("chatmux-ticker".to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            if !sender.submit(SessionEvent::Tick) {
                debug!("Ticker stopping");
                break;
            }
        })
}
