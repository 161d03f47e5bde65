//! The conversation-mode state machine.
//!
//! [`Mode`] is a closed enum; the active mode is set exactly once per turn
//! and fully determines which [`Response`] fields are legal:
//!
//! | Mode | message | question | actions |
//! |---|---|---|---|
//! | Listening | required | forbidden | forbidden |
//! | Clarifying | required | required | forbidden |
//! | OfferingDirection | required | forbidden | 2-4 items |
//! | Calming | required | forbidden | pause-class only |
//! | Stepping | step payload | forbidden | 0-2 items |
//!
//! [`validate`] enforces the table by stripping offending fields and
//! recording each repair. The mode itself is authoritative; a repair never
//! rejects the turn.

use crate::response::Response;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The single behavioral state governing a turn's response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Receive and reflect; no question, no actions
    Listening,
    /// Ask exactly one clarifying question
    Clarifying,
    /// Offer 2-4 directional options
    OfferingDirection,
    /// De-escalate; pause-class actions only
    Calming,
    /// Walk the task one step at a time
    Stepping,
}

impl Mode {
    /// Whether a question is required (`true`), forbidden (`false`).
    pub fn requires_question(&self) -> bool {
        matches!(self, Mode::Clarifying)
    }

    /// Inclusive bounds on the action list length for this mode.
    pub fn action_bounds(&self) -> (usize, usize) {
        match self {
            Mode::Listening | Mode::Clarifying => (0, 0),
            Mode::OfferingDirection => (2, 4),
            Mode::Calming => (0, 2),
            Mode::Stepping => (0, 2),
        }
    }

    /// Whether this mode restricts actions to the pause class.
    pub fn pause_class_only(&self) -> bool {
        matches!(self, Mode::Calming)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Listening => write!(f, "listening"),
            Mode::Clarifying => write!(f, "clarifying"),
            Mode::OfferingDirection => write!(f, "offering_direction"),
            Mode::Calming => write!(f, "calming"),
            Mode::Stepping => write!(f, "stepping"),
        }
    }
}

/// One recorded repair from [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    /// The mode whose whitelist was violated
    pub mode: Mode,
    /// The field that was repaired
    pub field: String,
    /// Human-readable description of what was done
    pub detail: String,
}

impl Repair {
    fn new(mode: Mode, field: &str, detail: impl Into<String>) -> Self {
        Self {
            mode,
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

/// Enforce the per-mode field whitelist, repairing violations in place.
///
/// Offending fields are stripped (never the turn rejected) and every repair
/// is recorded and logged. Validating an already-valid response returns it
/// unchanged with no repairs; validating any output of `validate` is a
/// value-level no-op.
pub fn validate(mut response: Response) -> (Response, Vec<Repair>) {
    let mode = response.mode;
    let mut repairs = Vec::new();

    // Message is required in every mode.
    if response.message.trim().is_empty() {
        repairs.push(Repair::new(
            mode,
            "message",
            "empty message replaced with the generic fallback",
        ));
        response.message = Response::listening_fallback().message;
    }

    // Question: required in Clarifying, forbidden elsewhere.
    match (mode.requires_question(), &response.question) {
        (false, Some(_)) => {
            repairs.push(Repair::new(mode, "question", "question forbidden in this mode"));
            response.question = None;
        }
        (true, None) => {
            // Cannot invent a question; record the gap. The composer
            // guarantees one on every Clarifying branch.
            repairs.push(Repair::new(mode, "question", "required question missing"));
        }
        _ => {}
    }
    if let Some(question) = &response.question {
        if question.trim().is_empty() {
            repairs.push(Repair::new(mode, "question", "blank question stripped"));
            response.question = None;
        }
    }

    // Actions: bounded per mode, pause-class only in Calming.
    let (min, max) = mode.action_bounds();
    if mode.pause_class_only() {
        let before = response.actions.len();
        response.actions.retain(|a| a.is_pause_class());
        if response.actions.len() < before {
            repairs.push(Repair::new(
                mode,
                "actions",
                "non-pause actions stripped from calming response",
            ));
        }
    }
    if response.actions.len() > max {
        repairs.push(Repair::new(
            mode,
            "actions",
            format!("action list truncated from {} to {}", response.actions.len(), max),
        ));
        response.actions.truncate(max);
    } else if !response.actions.is_empty() && response.actions.len() < min {
        repairs.push(Repair::new(
            mode,
            "actions",
            format!("action list below minimum of {}, stripped", min),
        ));
        response.actions.clear();
    } else if response.actions.is_empty() && min > 0 {
        // Cannot invent directions; record the gap, as with a missing
        // question. The composer guarantees the minimum on every branch.
        repairs.push(Repair::new(mode, "actions", "required directional actions missing"));
    }

    for repair in &repairs {
        warn!("mode invariant repaired: [{}] {}: {}", repair.mode, repair.field, repair.detail);
    }

    (response, repairs)
}
