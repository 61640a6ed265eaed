//! Platform adapter.
//!
//! Owns the application window and the native cursor set, toggles mouse
//! capture, reports display metrics and reads whole files from disk.

mod adapter;
mod cursor;
mod display;
mod file;

pub use adapter::{initialize, Platform};
pub use cursor::{CursorKind, CursorSet, CURSOR_COUNT};
pub use display::DisplayMetrics;
pub use file::load_file;
