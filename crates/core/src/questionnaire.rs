//! Buyer intake gate.
//!
//! Completion is inferred from the number of user turns only. Which of the
//! intake questions were actually answered is left to the persona prompt.

use crate::domain::conversation::{ConversationMessage, MessageRole};

pub const DEFAULT_REQUIRED_TURNS: usize = 9;

/// Phrases that read as an explicit request to see a car right away.
pub const EXPLICIT_REQUEST_PHRASES: [&str; 9] = [
    "תראה לי רכב",
    "תמצא לי רכב",
    "אני רוצה לראות רכב",
    "תמליץ לי על רכב",
    "show me a car",
    "find me a car",
    "recommend a car",
    "מה הרכב המתאים לי",
    "איזה רכב מתאים לי",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Enough user turns were collected; a match may be produced this turn.
    Complete,
    /// The buyer explicitly asked for a car before finishing the intake.
    ExplicitRequest,
    /// Keep interviewing.
    Incomplete { answered: usize, required: usize },
}

impl GateOutcome {
    pub fn allows_match(&self) -> bool {
        !matches!(self, Self::Incomplete { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionnaireGate {
    required_turns: usize,
    honor_explicit_requests: bool,
}

impl Default for QuestionnaireGate {
    fn default() -> Self {
        Self { required_turns: DEFAULT_REQUIRED_TURNS, honor_explicit_requests: false }
    }
}

impl QuestionnaireGate {
    pub fn new(required_turns: usize, honor_explicit_requests: bool) -> Self {
        Self { required_turns, honor_explicit_requests }
    }

    pub fn required_turns(&self) -> usize {
        self.required_turns
    }

    pub fn user_turns(messages: &[ConversationMessage]) -> usize {
        messages.iter().filter(|message| message.role == MessageRole::User).count()
    }

    pub fn is_complete(&self, messages: &[ConversationMessage]) -> bool {
        Self::user_turns(messages) >= self.required_turns
    }

    pub fn evaluate(&self, messages: &[ConversationMessage]) -> GateOutcome {
        let answered = Self::user_turns(messages);
        if answered >= self.required_turns {
            return GateOutcome::Complete;
        }

        let explicit = self.honor_explicit_requests
            && messages
                .last()
                .filter(|message| message.role == MessageRole::User)
                .is_some_and(|message| is_explicit_car_request(&message.content));
        if explicit {
            return GateOutcome::ExplicitRequest;
        }

        GateOutcome::Incomplete { answered, required: self.required_turns }
    }
}

pub fn is_explicit_car_request(message: &str) -> bool {
    let lowered = message.to_lowercase();
    EXPLICIT_REQUEST_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
