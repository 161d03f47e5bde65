//! Input classification: an ordered cascade of predicates mapping one turn
//! of text to a [`Signal`].
//!
//! The cascade is an explicit, ordered list, [`CASCADE`], evaluated in
//! sequence with first-match-wins. The ordering is part of the contract,
//! not an implementation detail: loss-of-function outranks intensity, which
//! outranks the legacy overwhelm list, and so on down to the word-count
//! default.

use crate::mode::Mode;
use crate::rules::{contains_any, RuleConfig};
use crate::signal::{Certainty, Signal, SignalType};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static EXPLANATORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(because|the problem is|the issue is|irrelevant|doesn'?t matter|that'?s why|which is why)\b",
    )
    .expect("invalid regex")
});

/// One rule of the classification cascade, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeRule {
    /// Stated inability to think/act
    LossOfFunction,
    /// Strong language without loss of function
    Intensity,
    /// Legacy generic overwhelm markers
    LegacyOverwhelm,
    /// Asked for the task to be made smaller
    ShrinkRequest,
    /// Any non-empty reply to a clarifying question presumes readiness
    ClarifyingReply,
    /// Explanatory phrasing, outside clarification
    Explanatory,
    /// Emotional keywords
    EmotionalKeyword,
    /// Assignment/task keywords
    TaskKeyword,
}

/// The cascade, first match wins. Rule order is the contract.
pub const CASCADE: [CascadeRule; 8] = [
    CascadeRule::LossOfFunction,
    CascadeRule::Intensity,
    CascadeRule::LegacyOverwhelm,
    CascadeRule::ShrinkRequest,
    CascadeRule::ClarifyingReply,
    CascadeRule::Explanatory,
    CascadeRule::EmotionalKeyword,
    CascadeRule::TaskKeyword,
];

impl CascadeRule {
    /// Evaluate this rule. Returns the signal type (and whether it carries
    /// loss of function) on a match.
    fn apply(
        &self,
        text: &str,
        text_lower: &str,
        prior_mode: Mode,
        rules: &RuleConfig,
    ) -> Option<(SignalType, bool)> {
        let vocab = &rules.vocabulary;
        match self {
            CascadeRule::LossOfFunction => contains_any(text_lower, &vocab.loss_of_function)
                .then_some((SignalType::Overwhelmed, true)),
            CascadeRule::Intensity => contains_any(text_lower, &vocab.intensity)
                .then_some((SignalType::IntenseEmotion, false)),
            CascadeRule::LegacyOverwhelm => contains_any(text_lower, &vocab.overwhelm_fallback)
                .then_some((SignalType::Overwhelmed, false)),
            CascadeRule::ShrinkRequest => contains_any(text_lower, &vocab.shrink_request)
                .then_some((SignalType::RequestToShrink, false)),
            CascadeRule::ClarifyingReply => {
                (prior_mode == Mode::Clarifying && !text.trim().is_empty())
                    .then_some((SignalType::ReadyForAction, false))
            }
            // Guarded against Clarifying to avoid re-entering clarification
            // loops; the ClarifyingReply rule has already consumed that case.
            CascadeRule::Explanatory => {
                (prior_mode != Mode::Clarifying && EXPLANATORY_PATTERN.is_match(text))
                    .then_some((SignalType::Explanatory, false))
            }
            CascadeRule::EmotionalKeyword => contains_any(text_lower, &vocab.emotional)
                .then_some((SignalType::Emotional, false)),
            CascadeRule::TaskKeyword => contains_any(text_lower, &vocab.task)
                .then_some((SignalType::ReadyForAction, false)),
        }
    }
}

/// Classify one turn of text against the prior mode.
///
/// Pure over `(text, prior_mode, rules)`: identical inputs yield identical
/// signals.
pub fn classify(text: &str, prior_mode: Mode, rules: &RuleConfig) -> Signal {
    let text_lower = text.to_lowercase();
    let certainty = detect_certainty(&text_lower, rules);

    for rule in CASCADE {
        if let Some((signal_type, loss_of_function)) =
            rule.apply(text, &text_lower, prior_mode, rules)
        {
            debug!("classified by {:?}: {} (certainty {})", rule, signal_type, certainty);
            let mut signal = Signal::new(signal_type, certainty);
            if loss_of_function {
                signal = signal.with_loss_of_function();
            }
            return signal;
        }
    }

    // Default: short text reads as emotional, longer text as task-ready.
    let signal_type = if text.split_whitespace().count() < 10 {
        SignalType::Emotional
    } else {
        SignalType::ReadyForAction
    };
    debug!("classified by word-count default: {} (certainty {})", signal_type, certainty);
    Signal::new(signal_type, certainty)
}

/// Detect the certainty level expressed in the text.
///
/// High-certainty markers are checked before low-certainty markers;
/// unmatched text defaults to Medium. Expects lowercased input; matching is
/// substring containment with no word-boundary checks.
pub fn detect_certainty(text_lower: &str, rules: &RuleConfig) -> Certainty {
    if contains_any(text_lower, &rules.certainty.high) {
        Certainty::High
    } else if contains_any(text_lower, &rules.certainty.low) {
        Certainty::Low
    } else {
        Certainty::Medium
    }
}
