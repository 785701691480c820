//! Terminal input producer.

use super::{EventSender, SessionEvent};
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How long one crossterm poll waits before re-checking the stop flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Handle to the running terminal reader thread.
#[derive(Debug)]
pub struct TerminalReader {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl TerminalReader {
    /// Ask the reader to exit and wait for it.
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        if self.handle.join().is_err() {
            warn!("Terminal reader thread panicked");
        }
    }
}

/// Spawn the thread that forwards key presses and resizes to the session loop.
///
/// Key release and repeat events are dropped so each keystroke is seen once.
pub fn spawn_terminal_reader(sender: EventSender) -> io::Result<TerminalReader> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let handle = thread::Builder::new()
        .name("chatmux-terminal".to_string())
        .spawn(move || read_loop(&sender, &flag))?;
    Ok(TerminalReader { stop, handle })
}

fn read_loop(sender: &EventSender, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        match event::poll(POLL_TIMEOUT) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(error = %e, "Terminal poll failed, stopping reader");
                return;
            }
        }

        let event = match event::read() {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Terminal read failed, stopping reader");
                return;
            }
        };

        if let Some(session_event) = translate(event) {
            if !sender.submit(session_event) {
                debug!("Terminal reader stopping");
                return;
            }
        }
    }
}

/// Map a crossterm event to a session event, dropping what the loop ignores.
pub fn translate(event: Event) -> Option<SessionEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(SessionEvent::Key(key)),
        Event::Resize(width, height) => Some(SessionEvent::Resize { width, height }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn forwards_key_presses() {
        assert!(matches!(
            translate(key(KeyEventKind::Press)),
            Some(SessionEvent::Key(_))
        ));
    }

    #[test]
    fn drops_release_and_repeat() {
        assert_eq!(translate(key(KeyEventKind::Release)), None);
        assert_eq!(translate(key(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn forwards_resize() {
        assert_eq!(
            translate(Event::Resize(100, 30)),
            Some(SessionEvent::Resize {
                width: 100,
                height: 30
            })
        );
    }

    #[test]
    fn ignores_focus_and_paste() {
        assert_eq!(translate(Event::FocusGained), None);
        assert_eq!(translate(Event::Paste("hi".to_string())), None);
    }
}
