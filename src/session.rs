//! Session state: conversation turns, context, and the per-task progress
//! the engine carries between turns.
//!
//! A [`Session`] is an explicit value threaded through every call: one
//! instance per conversation, never a module-level singleton, so multiple
//! concurrent conversations are just multiple `Session` values.

use crate::mode::Mode;
use crate::planner::TaskKind;
use crate::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// One recorded user turn.
///
/// Immutable once written, except for the flags set by the composer that
/// produced it (`had_question`/`last_question`) and the direction the UI
/// reports back (`selected_direction`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The raw text the user submitted
    pub raw_input: String,
    /// Classification of this turn
    pub signal: Signal,
    /// When the turn was accepted
    pub timestamp: DateTime<Utc>,
    /// Whether the composed response carried a question
    pub had_question: bool,
    /// The question text, when `had_question` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_question: Option<String>,
    /// Directional action id the user selected after this turn, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_direction: Option<String>,
}

impl ConversationTurn {
    /// Record a new turn from raw input and its classification.
    pub fn new(raw_input: impl Into<String>, signal: Signal) -> Self {
        Self {
            raw_input: raw_input.into(),
            signal,
            timestamp: Utc::now(),
            had_question: false,
            last_question: None,
            selected_direction: None,
        }
    }

    /// Mark that the response to this turn asked a question.
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.had_question = true;
        self.last_question = Some(question.into());
    }
}

/// The ordered turn history of one session. Grows monotonically until reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// All turns, oldest first
    pub turns: Vec<ConversationTurn>,
}

impl ConversationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// The most recent turn.
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// The most recent turn, mutable (for composer-owned flags).
    pub fn last_turn_mut(&mut self) -> Option<&mut ConversationTurn> {
        self.turns.last_mut()
    }

    /// Number of turns so far.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turn has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The direction selected on the most recent turn that has one.
    pub fn last_selected_direction(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find_map(|t| t.selected_direction.as_deref())
    }
}

/// Progress through an accepted task. Step *content* is never stored here;
/// steps are regenerated from `(original_input, kind)` on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    /// The input the task was accepted from
    pub original_input: String,
    /// Classified task kind
    pub kind: TaskKind,
    /// Index of the step currently in front of the user
    pub current_step_index: usize,
    /// Answers collected from steps that needed input
    pub answers: Vec<String>,
    /// Checklist completion per step index
    pub checklist_progress: BTreeMap<usize, Vec<bool>>,
}

impl TaskState {
    /// Start tracking a freshly accepted task.
    pub fn new(original_input: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            original_input: original_input.into(),
            kind,
            current_step_index: 0,
            answers: Vec::new(),
            checklist_progress: BTreeMap::new(),
        }
    }
}

/// One conversation: identity, mode, history, and task progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identity
    pub id: Uuid,
    /// Current conversation mode
    pub mode: Mode,
    /// Ordered turn history
    pub context: ConversationContext,
    /// Progress through the accepted task, once one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskState>,
}

impl Session {
    /// Create a fresh session in Listening mode.
    pub fn new() -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            mode: Mode::Listening,
            context: ConversationContext::new(),
            task: None,
        };
        info!("session {} created", session.id);
        session
    }

    /// Drop history, task progress, and mode; keep the identity.
    pub fn reset(&mut self) {
        info!("session {} reset", self.id);
        self.mode = Mode::Listening;
        self.context = ConversationContext::new();
        self.task = None;
    }

    /// Whether the next turn would be the first of the conversation.
    pub fn is_first_turn(&self) -> bool {
        self.context.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Certainty, SignalType};

    fn signal() -> Signal {
        Signal::new(SignalType::Emotional, Certainty::Medium)
    }

    #[test]
    fn test_turn_question_flags() {
        let mut turn = ConversationTurn::new("this is hard", signal());
        assert!(!turn.had_question);

        turn.set_question("What about it feels the worst right now?");
        assert!(turn.had_question);
        assert_eq!(
            turn.last_question.as_deref(),
            Some("What about it feels the worst right now?")
        );
    }

    #[test]
    fn test_context_grows_monotonically() {
        let mut context = ConversationContext::new();
        context.push_turn(ConversationTurn::new("one", signal()));
        context.push_turn(ConversationTurn::new("two", signal()));

        assert_eq!(context.len(), 2);
        assert_eq!(context.last_turn().unwrap().raw_input, "two");
    }

    #[test]
    fn test_last_selected_direction_scans_backwards() {
        let mut context = ConversationContext::new();
        let mut first = ConversationTurn::new("one", signal());
        first.selected_direction = Some("talk-more-about-this".to_string());
        context.push_turn(first);
        context.push_turn(ConversationTurn::new("two", signal()));

        assert_eq!(
            context.last_selected_direction(),
            Some("talk-more-about-this")
        );
    }

    #[test]
    fn test_session_reset_clears_state() {
        let mut session = Session::new();
        let id = session.id;
        session.context.push_turn(ConversationTurn::new("hi", signal()));
        session.mode = Mode::Clarifying;
        session.task = Some(TaskState::new("essay", TaskKind::Essay));

        session.reset();
        assert_eq!(session.id, id);
        assert_eq!(session.mode, Mode::Listening);
        assert!(session.context.is_empty());
        assert!(session.task.is_none());
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
    }
}
