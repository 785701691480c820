//! View-state layer: viewport geometry and the pure frame projection.
//!
//! # Module Structure
//!
//! - `types`: Viewport dimensions and the derived pane capacities
//! - `projector`: `project` from a session model to a [`ViewModel`]

pub mod projector;
pub mod types;

pub use projector::{
    elide_name, project, ChatView, ContactEntry, InputView, SidebarView, ViewModel,
    INPUT_PLACEHOLDER, WAITING_PLACEHOLDER,
};
pub use types::Viewport;
