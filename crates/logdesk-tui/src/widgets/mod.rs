//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`StatusBar`] - Top status bar with phase, endpoint and session
//! - [`InputBar`] - Bottom input box with waiting indicator

mod input_bar;
mod status_bar;

pub use input_bar::InputBar;
pub use status_bar::{StatusBar, StatusBarContent};
