//! Terminal front end: the [`ChatView`] seam, its terminal implementation,
//! output formatting and input parsing.

pub mod formatter;
pub mod input;
pub mod prompt;
pub mod terminal;
pub mod view;

pub use formatter::MessageFormatter;
pub use input::{InputError, parse_input};
pub use terminal::TerminalView;
pub use view::{ChatView, ReadinessFlag};
