//! Conversation transcript display.

mod widget;

pub use widget::{role_label, TranscriptPane};
