//! Signal types: the classified intent of a single user turn.
//!
//! A [`Signal`] is derived fresh on every turn by the classifier and is never
//! persisted. It carries the intent category, the certainty level expressed
//! in the user's wording, and whether the turn stated an inability to
//! think/act (distinct from merely strong language).

use serde::{Deserialize, Serialize};

/// The classified intent category of one user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    /// Capacity is exceeded; the user may or may not still be able to act
    Overwhelmed,
    /// Strong language without a stated loss of function
    IntenseEmotion,
    /// An emotional read on the task (frustrated, bored, ...)
    Emotional,
    /// The user is explaining or justifying something
    Explanatory,
    /// The user asked for the task to be made smaller
    RequestToShrink,
    /// The user is ready to work on the task
    ReadyForAction,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::Overwhelmed => write!(f, "overwhelmed"),
            SignalType::IntenseEmotion => write!(f, "intense_emotion"),
            SignalType::Emotional => write!(f, "emotional"),
            SignalType::Explanatory => write!(f, "explanatory"),
            SignalType::RequestToShrink => write!(f, "request_to_shrink"),
            SignalType::ReadyForAction => write!(f, "ready_for_action"),
        }
    }
}

/// Hedging/confidence expressed in the user's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    /// Hedged wording ("maybe", "kind of", "I think")
    Low,
    /// No certainty marker either way
    Medium,
    /// Absolute wording ("always", "definitely", "can't")
    High,
}

impl Certainty {
    /// Whether mirrors and questions must use the hedged phrase set.
    pub fn is_hedged(&self) -> bool {
        matches!(self, Certainty::Low)
    }
}

impl std::fmt::Display for Certainty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Certainty::Low => write!(f, "low"),
            Certainty::Medium => write!(f, "medium"),
            Certainty::High => write!(f, "high"),
        }
    }
}

/// The full classification of one user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Intent category
    pub signal_type: SignalType,
    /// Certainty level expressed in the wording
    pub certainty: Certainty,
    /// The turn stated an inability to think or act
    pub loss_of_function: bool,
}

impl Signal {
    /// Create a signal with no loss of function.
    pub fn new(signal_type: SignalType, certainty: Certainty) -> Self {
        Self {
            signal_type,
            certainty,
            loss_of_function: false,
        }
    }

    /// Mark the signal as carrying a loss-of-function statement.
    pub fn with_loss_of_function(mut self) -> Self {
        self.loss_of_function = true;
        self
    }
}
