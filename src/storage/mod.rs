//! Storage module for persisting mirrored artifacts
//!
//! The folder tree is the only durable record of a run:
//! - `<root>/chapter_<N>/<resource file name>` in resources mode
//! - `<root>/chapter_<N>/<page:03>.html` in archive mode
//!
//! Every file is written atomically so an interrupted run never leaves a
//! truncated artifact behind.

mod atomic;
mod layout;

pub use atomic::write_atomic;
pub use layout::{archive_file_name, OutputLayout};
