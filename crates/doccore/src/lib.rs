//! Presentation-agnostic core of simpledit: the document session and the
//! pieces it is built from.

pub mod buffer;
pub mod file_io;
pub mod session;
pub mod title;

pub use buffer::{Position, TextBuffer};
pub use session::{Choice, Dialogs, Session};
pub use title::{status_text, window_title, APP_NAME, UNTITLED};
