use std::time::Duration;

use catena_common::types::ChatMessage;

use crate::history::ConversationHistory;
use crate::surface::ChatSurface;
use crate::transport::{TurnError, TurnTransport};

pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply rendered and appended to the history.
    Completed,
    /// Failure shown in place of the placeholder; history keeps the user turn.
    Failed,
    /// Empty input; nothing happened.
    Ignored,
    /// A turn is already in flight; concurrent turns are disallowed.
    Busy,
}

/// Drives one user turn through `Idle → Sending → (Success | Failed) → Idle`.
///
/// The transport and the output surface are constructor arguments, so a turn
/// can be exercised end to end without a network or a real screen.
pub struct ChatController<T: TurnTransport, S: ChatSurface> {
    transport: T,
    surface: S,
    history: ConversationHistory,
    phase: TurnPhase,
    questions: Vec<String>,
    timeout: Duration,
}

impl<T: TurnTransport, S: ChatSurface> ChatController<T, S> {
    pub fn new(transport: T, surface: S, timeout: Duration) -> Self {
        Self {
            transport,
            surface,
            history: ConversationHistory::new(),
            phase: TurnPhase::Idle,
            questions: Vec::new(),
            timeout,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Submit one user message and drive the turn to completion.
    ///
    /// The exclusive borrow already serializes turns within a task; the phase
    /// guard backs that up if the controller is ever driven reentrantly.
    pub async fn submit(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }
        if self.phase == TurnPhase::Sending {
            return TurnOutcome::Busy;
        }

        self.phase = TurnPhase::Sending;
        self.history.push(ChatMessage::user(text));
        self.surface.show_user(text);
        self.surface.show_placeholder();

        // The only cancellation path: a timed-out call is abandoned and the
        // turn fails with a timeout-specific message.
        let result = match tokio::time::timeout(
            self.timeout,
            self.transport.send(self.history.snapshot()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(TurnError::Timeout),
        };

        self.surface.clear_placeholder();

        let outcome = match result {
            Ok(turn) => match turn.raw.first_content().map(str::to_string) {
                Some(content) => {
                    self.surface.insert_assistant_html(&turn.message_html);
                    self.surface.replace_citations_html(&turn.citations_html);
                    self.questions = turn.raw.related_questions.clone();
                    self.surface
                        .replace_questions(&turn.questions_html, &self.questions);
                    // Plain text goes into the history, never the HTML.
                    self.history.push(ChatMessage::assistant(content));
                    TurnOutcome::Completed
                }
                None => {
                    self.surface
                        .show_failure(failure_message(&TurnError::Parse(
                            "reply carries no assistant message".to_string(),
                        )));
                    TurnOutcome::Failed
                }
            },
            Err(err) => {
                self.surface.show_failure(failure_message(&err));
                TurnOutcome::Failed
            }
        };

        self.phase = TurnPhase::Idle;
        outcome
    }

    /// Click-to-reuse: copy the selected related question into the input.
    pub fn reuse_question(&mut self, index: usize) -> Option<String> {
        let question = self.questions.get(index)?.clone();
        self.surface.set_input(&question);
        Some(question)
    }

    pub fn related_questions(&self) -> &[String] {
        &self.questions
    }
}

/// One localized, user-facing line per failure category. Diagnostic detail
/// stays in the logs.
pub fn failure_message(err: &TurnError) -> &'static str {
    match err {
        TurnError::Timeout => "The request timed out. Please try again.",
        TurnError::Network(_) => "Could not reach the server. Check your connection.",
        TurnError::Parse(_) => "The server reply could not be read.",
        TurnError::Gateway { .. } => "The service could not answer. Please try again later.",
        TurnError::Unknown(_) => "Something went wrong. Please try again.",
    }
}
