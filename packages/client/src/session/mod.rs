//! The chat session: one owned object driven by one event channel.

mod dispatcher;
mod event;
mod session;
mod tasks;

pub use dispatcher::{Dispatched, Dispatcher};
pub use event::{Flow, SessionEvent, UserAction};
pub use session::{ChatSession, Collaborators, ConnectOutcome};
pub use tasks::{PendingTasks, TaskKey};
