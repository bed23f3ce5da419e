//! Terminal user interface (TUI) for regard.
//!
//! Provides an interactive full-screen console for reviewing the engagement
//! store and dispatching outreach.
//!
//! ## Entry points
//!
//! - [`console::run_console_tui`] — interactive store console with marking
//!   and posting.

pub mod console;
