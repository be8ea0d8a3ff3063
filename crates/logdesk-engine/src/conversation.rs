//! Conversation controller.
//!
//! Owns the transcript, the input box and the guard flags that decide when a
//! message may be sent. Time is passed in explicitly, so every transition is
//! a plain method call:
//!
//! ```text
//!            composition_start            composition_end(now)
//!   Idle ─────────────────────▶ Composing ─────────────────────▶ Debouncing
//!    ▲                                                              │
//!    │                       window elapsed                         │
//!    ├──────────────────────────────────────────────────────────────┘
//!    │
//!    │ finish(outcome)          press_enter(now) / submit()
//!    └────────────── Submitting ◀──────────────────────────── Idle
//! ```

use crate::chat::{ChatMessage, InferResponse};
use crate::client::QueryService;
use crate::config::Config;
use crate::debounce::Debounce;
use crate::input::InputBuffer;
use crate::locale::Locale;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Where the controller is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready for Enter.
    Idle,
    /// An IME composition is in progress.
    Composing,
    /// A composition just ended; Enter is still ignored.
    DebouncingAfterComposition,
    /// A request is in flight.
    Submitting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Composing => write!(f, "composing"),
            Self::DebouncingAfterComposition => write!(f, "debouncing"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

/// A query accepted by the controller that still has to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Raw input as typed, untrimmed.
    pub input: String,
}

/// Result of a query, as the controller consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server's authoritative transcript.
    Success(Vec<ChatMessage>),
    /// Why the request failed.
    Failure(String),
}

impl SubmitOutcome {
    /// Fold a request result into an outcome.
    pub fn from_result<E: std::fmt::Display>(result: Result<InferResponse, E>) -> Self {
        match result {
            Ok(response) => Self::Success(response.messages),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

/// Transcript plus submission guard for one input box.
#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Vec<ChatMessage>,
    input: InputBuffer,
    composing: bool,
    debounce: Debounce,
    submitting: bool,
    locale: Locale,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new(debounce: Duration, locale: Locale) -> Self {
        Self {
            transcript: Vec::new(),
            input: InputBuffer::new(),
            composing: false,
            debounce: Debounce::new(debounce),
            submitting: false,
            locale,
        }
    }

    /// Create an empty conversation using configured window and locale.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.debounce(), config.locale)
    }

    /// Messages currently on display, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The input box.
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// The input box, for editing.
    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.submitting
    }

    /// Current phase at `now`.
    pub fn phase(&self, now: Instant) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.composing {
            Phase::Composing
        } else if self.debounce.is_pending(now) {
            Phase::DebouncingAfterComposition
        } else {
            Phase::Idle
        }
    }

    /// An IME composition started.
    pub fn composition_start(&mut self) {
        self.composing = true;
        self.debounce.cancel();
    }

    /// An IME composition ended at `now`; Enter stays blocked for the window.
    pub fn composition_end(&mut self, now: Instant) {
        self.composing = false;
        self.debounce.restart(now);
    }

    /// Enter pressed at `now`. Accepted only when idle.
    pub fn press_enter(&mut self, now: Instant) -> Option<PendingQuery> {
        let phase = self.phase(now);
        if phase != Phase::Idle {
            debug!(%phase, "Enter ignored");
            return None;
        }
        self.begin()
    }

    /// Explicit submit action (send button). Ignores composition state.
    pub fn submit(&mut self) -> Option<PendingQuery> {
        if self.submitting {
            debug!("Submit ignored while a request is in flight");
            return None;
        }
        self.begin()
    }

    fn begin(&mut self) -> Option<PendingQuery> {
        if self.input.is_blank() {
            return None;
        }
        let input = self.input.take();
        self.transcript.push(ChatMessage::user(input.clone()));
        self.submitting = true;
        Some(PendingQuery { input })
    }

    /// Apply the outcome of the in-flight request.
    pub fn finish(&mut self, outcome: SubmitOutcome) {
        if !self.submitting {
            warn!("Ignoring completion with no request in flight");
            return;
        }
        match outcome {
            SubmitOutcome::Success(messages) => {
                self.transcript = messages;
            }
            SubmitOutcome::Failure(reason) => {
                self.transcript
                    .push(ChatMessage::assistant(self.locale.request_failed(&reason)));
            }
        }
        self.submitting = false;
    }

    /// Press Enter at `now` and, if accepted, run the query to completion.
    ///
    /// Returns whether a request was issued.
    pub async fn send<S: QueryService>(&mut self, service: &S, now: Instant) -> bool {
        let Some(pending) = self.press_enter(now) else {
            return false;
        };
        let result = service.query_log(&pending.input).await;
        self.finish(SubmitOutcome::from_result(result));
        true
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
