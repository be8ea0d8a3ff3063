//! Theme components for the TUI.
//!
//! This module provides [`Theme`], the Catppuccin Mocha color palette.

mod colors;

pub use colors::Theme;
