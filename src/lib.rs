//! chatmux
//!
//! Terminal session multiplexer for a multi-conversation chat client.
//!
//! Pure core (`state`, `view_state`) and impure shell (`source`, `dispatch`,
//! `store`, `view`): events from the terminal, a ticker and the network
//! converge on one bridge, a pure transition function turns them into
//! commands, and the dispatcher executes those against the messaging client
//! and the history store.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod source;
pub mod state;
pub mod store;
pub mod view;
pub mod view_state;
