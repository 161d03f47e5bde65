//! Answer detection: decides whether a turn answers the pending clarifying
//! question.
//!
//! The sole purpose of this module is anti-chaining: the system must never
//! ask two clarifying questions in a row about the same concern. A turn is
//! treated as an answer only when every check agrees; a single
//! new-topic marker overrides everything and releases the pending question.

use crate::session::ConversationTurn;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DIRECT_HELP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(help me|how do i|can you|could you|i need help|show me)\b")
        .expect("invalid regex")
});

static TOPIC_SHIFT_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(actually|wait)\b").expect("invalid regex"));

static DECLARATIVE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(it'?s|its|the|that'?s|because|mostly|probably|honestly|just)\b")
        .expect("invalid regex")
});

static WH_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(what|why|how|when|where|who|which)\b").expect("invalid regex")
});

static HEDGED_STANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bi (think|wonder|guess)\b").expect("invalid regex"));

/// Markers that introduce new ambiguity.
const UNCERTAINTY_MARKERS: &[&str] = &[
    "maybe", "not sure", "i guess", "i think", "kind of", "sort of", "possibly",
];

/// Markers of a committed, declarative answer.
const ANSWER_MARKERS: &[&str] = &[
    "because", "it's", "its", "doesn't", "don't", "is", "was", "just",
];

/// Question words that align with difficulty-flavored answers.
const DIFFICULTY_TRIGGERS: &[&str] = &["worst", "hardest", "hard", "difficult", "stuck"];
const DIFFICULTY_ANSWERS: &[&str] = &[
    "hard",
    "hardest",
    "difficult",
    "confusing",
    "confused",
    "because",
    "stuck",
    "boring",
    "worst",
    "lost",
];

/// Question words that align with start/first-move answers.
const START_TRIGGERS: &[&str] = &["start", "begin", "first"];
const START_ANSWERS: &[&str] = &["start", "begin", "first", "beginning", "open", "page"];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "it", "its", "it's", "this", "that", "what", "about", "feels",
    "feel", "right", "now", "you", "your", "of", "to", "and", "or", "do", "does", "with",
    "for", "most", "part", "make", "makes",
];

/// Whether the turn abandons the pending question for a new concern.
///
/// Checked before everything else and takes precedence: a direct-help
/// prefix, an "actually"/"wait" opener, a trailing question mark, or more
/// than 20 words all read as a topic change, not an answer.
pub fn introduces_new_topic(text: &str) -> bool {
    let trimmed = text.trim();
    DIRECT_HELP_PREFIX.is_match(trimmed)
        || TOPIC_SHIFT_OPENER.is_match(trimmed)
        || trimmed.ends_with('?')
        || trimmed.split_whitespace().count() > 20
}

/// Whether `text` answers the question pending from `prior` turn.
///
/// Requires all of: a recorded pending question, short-or-declarative
/// non-exploratory phrasing, topical overlap with the question, and no net
/// increase in ambiguity. [`introduces_new_topic`] overrides everything.
pub fn is_answer(text: &str, prior: Option<&ConversationTurn>) -> bool {
    if introduces_new_topic(text) {
        debug!("turn introduces a new topic; pending question released");
        return false;
    }

    let Some(prior) = prior else {
        return false;
    };
    let Some(question) = prior.last_question.as_deref().filter(|_| prior.had_question) else {
        return false;
    };

    let trimmed = text.trim();
    let short = trimmed.split_whitespace().count() <= 10;
    let declarative = DECLARATIVE_OPENER.is_match(trimmed);
    let exploratory = trimmed.ends_with('?')
        || WH_OPENER.is_match(trimmed)
        || HEDGED_STANCE.is_match(trimmed);
    if !(short || declarative) || exploratory {
        return false;
    }

    if !topically_aligned(trimmed, question) {
        debug!("turn does not overlap the pending question topically");
        return false;
    }

    net_reduces_ambiguity(trimmed)
}

/// Topical overlap between an answer and the question it may be answering:
/// direct content-word overlap, or membership in an alignment group keyed
/// off the question's wording.
fn topically_aligned(answer: &str, question: &str) -> bool {
    let answer_lower = answer.to_lowercase();
    let question_lower = question.to_lowercase();

    let direct_overlap = question_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(w))
        .any(|w| answer_lower.contains(w));
    if direct_overlap {
        return true;
    }

    let aligned = |triggers: &[&str], answers: &[&str]| {
        triggers.iter().any(|t| question_lower.contains(t))
            && answers.iter().any(|a| answer_lower.contains(a))
    };
    aligned(DIFFICULTY_TRIGGERS, DIFFICULTY_ANSWERS) || aligned(START_TRIGGERS, START_ANSWERS)
}

/// The ratio of uncertainty markers to answer markers must not exceed 1:
/// the turn has to net-reduce ambiguity rather than introduce more.
fn net_reduces_ambiguity(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    let count = |markers: &[&str]| -> usize {
        markers.iter().map(|m| lower.matches(m).count()).sum()
    };
    count(UNCERTAINTY_MARKERS) <= count(ANSWER_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Certainty, Signal, SignalType};

    fn questioned_turn(question: &str) -> ConversationTurn {
        let mut turn = ConversationTurn::new(
            "this is hard",
            Signal::new(SignalType::Emotional, Certainty::Medium),
        );
        turn.set_question(question);
        turn
    }

    #[test]
    fn test_short_declarative_aligned_answer() {
        let prior = questioned_turn("What about it feels the worst right now?");
        assert!(is_answer("the reading is just confusing", Some(&prior)));
    }

    #[test]
    fn test_no_pending_question_means_no_answer() {
        let turn = ConversationTurn::new(
            "whatever",
            Signal::new(SignalType::Emotional, Certainty::Medium),
        );
        assert!(!is_answer("the reading is just confusing", Some(&turn)));
        assert!(!is_answer("the reading is just confusing", None));
    }

    #[test]
    fn test_exploratory_phrasing_is_not_an_answer() {
        let prior = questioned_turn("What about it feels the worst right now?");
        assert!(!is_answer("what do you mean by worst", Some(&prior)));
        assert!(!is_answer("i think it might be the reading, i wonder", Some(&prior)));
    }

    #[test]
    fn test_trailing_question_mark_is_new_topic() {
        let prior = questioned_turn("What about it feels the worst right now?");
        assert!(!is_answer("is the reading the hard part?", Some(&prior)));
        assert!(introduces_new_topic("is the reading the hard part?"));
    }

    #[test]
    fn test_direct_help_prefix_forces_new_topic() {
        assert!(introduces_new_topic("help me write the intro"));
        assert!(introduces_new_topic("how do i start this"));
        let prior = questioned_turn("What about it feels the worst right now?");
        assert!(!is_answer("help me with the hard part", Some(&prior)));
    }

    #[test]
    fn test_topic_shift_openers() {
        assert!(introduces_new_topic("actually, forget the essay"));
        assert!(introduces_new_topic("wait, there's a second worksheet"));
    }

    #[test]
    fn test_long_input_is_new_topic() {
        let long = "well there is this other thing that happened in class today and i keep \
                    thinking about it instead of the homework which is also late";
        assert!(introduces_new_topic(long));
    }

    #[test]
    fn test_unaligned_answer_rejected() {
        let prior = questioned_turn("What about it feels the worst right now?");
        assert!(!is_answer("the weather is nice", Some(&prior)));
    }

    #[test]
    fn test_uncertainty_heavy_reply_rejected() {
        let prior = questioned_turn("What about it feels the worst right now?");
        // Topically aligned, but two uncertainty markers against one answer marker.
        assert!(!is_answer("maybe it's hard, not sure", Some(&prior)));
    }

    #[test]
    fn test_direct_word_overlap_aligns() {
        let prior = questioned_turn("Is it the topic or the deadline that bothers you?");
        assert!(is_answer("the deadline mostly", Some(&prior)));
    }
}
