//! Response types: the single composed reply for one turn.
//!
//! A [`Response`] carries exactly one message, at most one question, and a
//! bounded action list. Which fields may be populated is determined entirely
//! by the [`Mode`](crate::mode::Mode); the state machine enforces the
//! per-mode whitelist in [`validate`](crate::mode::validate).

use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Fixed action-id overrides. Labels not listed here get the kebab-case
/// transform of the label.
const ACTION_ID_OVERRIDES: &[(&str, &str)] = &[("Pause", "pause"), ("Come back later", "pause")];

/// One user-selectable action in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Button label shown to the user
    pub label: String,
    /// Stable identifier reported back on selection
    pub action_id: String,
}

impl Action {
    /// Create an action from a label; the id comes from the override table
    /// or the kebab-case transform.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let action_id = ACTION_ID_OVERRIDES
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, id)| (*id).to_string())
            .unwrap_or_else(|| kebab_case(&label));
        Self { label, action_id }
    }

    /// Whether this is a pause-class action (the only class Calming allows).
    pub fn is_pause_class(&self) -> bool {
        self.action_id == "pause"
    }
}

/// Lowercase, non-alphanumeric runs collapsed to single hyphens.
pub fn kebab_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_hyphen = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// The composed reply for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The mode that produced (and constrains) this response
    pub mode: Mode,
    /// Mirror, acknowledgment, reassurance, or step payload
    pub message: String,
    /// At most one question per turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Ordered, bounded action list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Response {
    /// A Listening response: message only.
    pub fn listening(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Listening,
            message: message.into(),
            question: None,
            actions: Vec::new(),
        }
    }

    /// A Clarifying response: message plus exactly one question.
    pub fn clarifying(message: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            mode: Mode::Clarifying,
            message: message.into(),
            question: Some(question.into()),
            actions: Vec::new(),
        }
    }

    /// An OfferingDirection response: message plus 2-4 directional actions.
    pub fn offering_direction(message: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            mode: Mode::OfferingDirection,
            message: message.into(),
            question: None,
            actions,
        }
    }

    /// A Calming response: one reassurance sentence plus pause-class actions.
    pub fn calming(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Calming,
            message: message.into(),
            question: None,
            actions: vec![Action::new("Pause"), Action::new("Come back later")],
        }
    }

    /// A Stepping response: step payload plus 0-2 actions.
    pub fn stepping(message: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            mode: Mode::Stepping,
            message: message.into(),
            question: None,
            actions,
        }
    }

    /// The default fallback when nothing valid could be composed: a generic
    /// mirror in Listening mode. Never fails, never carries other fields.
    pub fn listening_fallback() -> Self {
        Self::listening("I'm here. Say a bit more about what's going on.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("Start this step"), "start-this-step");
        assert_eq!(kebab_case("Make it smaller"), "make-it-smaller");
        assert_eq!(kebab_case("That makes sense"), "that-makes-sense");
        assert_eq!(kebab_case("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_action_id_overrides() {
        assert_eq!(Action::new("Pause").action_id, "pause");
        assert_eq!(Action::new("Come back later").action_id, "pause");
        assert_eq!(Action::new("Talk more about this").action_id, "talk-more-about-this");
    }

    #[test]
    fn test_pause_class() {
        assert!(Action::new("Pause").is_pause_class());
        assert!(Action::new("Come back later").is_pause_class());
        assert!(!Action::new("Start this step").is_pause_class());
    }

    #[test]
    fn test_calming_carries_only_pause_class() {
        let response = Response::calming("You can pause whenever you want.");
        assert!(response.actions.iter().all(|a| a.is_pause_class()));
        assert!(response.question.is_none());
    }

    #[test]
    fn test_serde_skips_empty_fields() {
        let json = serde_json::to_string(&Response::listening("hi")).unwrap();
        assert!(!json.contains("question"));
        assert!(!json.contains("actions"));
    }
}
