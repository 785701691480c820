//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod layout;
mod styles;

pub use layout::render_layout;
pub use styles::{ColorConfig, PaneStyles};

use crate::config::KeyBindings;
use crate::dispatch::Dispatcher;
use crate::source::{EventBridge, SessionEvent};
use crate::state::SessionModel;
use crate::view_state::project;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend. Owns the
/// session model and the dispatcher; the loop is the only mutator of both.
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    model: SessionModel,
    dispatcher: Dispatcher,
    key_bindings: KeyBindings,
    styles: PaneStyles,
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    pub fn new(
        terminal: Terminal<B>,
        model: SessionModel,
        dispatcher: Dispatcher,
        key_bindings: KeyBindings,
        styles: PaneStyles,
    ) -> Self {
        Self {
            terminal,
            model,
            dispatcher,
            key_bindings,
            styles,
        }
    }

    /// Run the session loop until quit or until every producer is gone.
    ///
    /// Redraws after every event.
    pub fn run(&mut self, bridge: &EventBridge) -> Result<(), TuiError> {
        self.sync_viewport();
        self.draw()?;

        while let Some(event) = bridge.next_event() {
            self.step(event);
            if self.model.is_terminated() {
                info!("Session ended by user");
                return Ok(());
            }
            self.draw()?;
        }

        debug!("All event producers gone, ending session");
        Ok(())
    }

    /// Apply one event and execute the commands it produced.
    pub fn step(&mut self, event: SessionEvent) {
        let commands = self.model.handle_event(event, &self.key_bindings);
        self.dispatcher.execute_all(commands, &mut self.model);
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let view = project(&self.model, self.model.viewport());
        let styles = self.styles;
        self.terminal
            .draw(|frame| render_layout(frame, &view, &styles))?;
        Ok(())
    }

    pub fn model(&self) -> &SessionModel {
        &self.model
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Feed the real terminal size in before the first resize event arrives.
    fn sync_viewport(&mut self) {
        match self.terminal.size() {
            Ok(size) if size.width > 0 => self.step(SessionEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            _ => debug!("Terminal size unavailable, keeping default viewport"),
        }
    }
}

/// Set up the terminal, run the session loop, and restore the terminal.
///
/// Event producers must already be attached to `bridge`. The terminal is
/// restored even when the loop fails.
pub fn run_session(
    model: SessionModel,
    dispatcher: Dispatcher,
    bridge: &EventBridge,
    key_bindings: KeyBindings,
    styles: PaneStyles,
) -> Result<(), TuiError> {
    enable_raw_mode()?;
    let result = enter_and_run(model, dispatcher, bridge, key_bindings, styles);

    // Always restore terminal state
    restore_terminal()?;

    result
}

fn enter_and_run(
    model: SessionModel,
    dispatcher: Dispatcher,
    bridge: &EventBridge,
    key_bindings: KeyBindings,
    styles: PaneStyles,
) -> Result<(), TuiError> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut app = TuiApp::new(terminal, model, dispatcher, key_bindings, styles);
    app.run(bridge)
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
