//! Rule vocabulary: keyword lists, certainty markers, mirror phrases,
//! directional options, and content-policy categories.
//!
//! A [`RuleConfig`] is loaded once (from JSON, or from the built-in
//! vocabulary) and treated as frozen for the process lifetime. Consumers
//! receive `&RuleConfig` and never mutate it at runtime; additions go through
//! config review, not code.
//!
//! All keyword matching in this crate is case-insensitive substring
//! containment with no word-boundary checking ("hated" matches "hate").
//! That fuzziness is part of the observed contract and is preserved.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Certainty marker lists. High-certainty markers are checked before
/// low-certainty markers; the first list with a hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertaintyMarkers {
    /// Absolute wording ("always", "definitely", "can't")
    pub high: Vec<String>,
    /// Hedged wording ("maybe", "kind of", "I think")
    pub low: Vec<String>,
}

impl Default for CertaintyMarkers {
    fn default() -> Self {
        Self {
            high: to_vec(&[
                "always",
                "never",
                "definitely",
                "can't",
                "cant",
                "impossible",
                "every time",
                "completely",
                "totally",
                "no way",
            ]),
            low: to_vec(&[
                "maybe",
                "kind of",
                "kinda",
                "sort of",
                "i think",
                "i guess",
                "probably",
                "might",
                "not sure",
                "a little",
            ]),
        }
    }
}

/// Classification keyword lists, one per cascade rule.
///
/// Two overwhelm vocabularies exist: the loss-of-function/intensity split
/// (authoritative, cascade steps 1-2) and the legacy generic list (cascade
/// step 3 only). The legacy list can never set `loss_of_function`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationVocabulary {
    /// Stated inability to think or act
    pub loss_of_function: Vec<String>,
    /// Strong language without a stated loss of function
    pub intensity: Vec<String>,
    /// Legacy generic overwhelm markers
    pub overwhelm_fallback: Vec<String>,
    /// Requests to make the task smaller
    pub shrink_request: Vec<String>,
    /// Emotional reads on the task
    pub emotional: Vec<String>,
    /// Assignment/task words and direct asks
    pub task: Vec<String>,
}

impl Default for ClassificationVocabulary {
    fn default() -> Self {
        Self {
            loss_of_function: to_vec(&[
                "can't think",
                "cant think",
                "can't do this",
                "cant do this",
                "can't focus",
                "cant focus",
                "can't even start",
                "cant even start",
                "frozen",
                "nothing works",
                "shutting down",
                "brain won't work",
                "mind is blank",
            ]),
            intensity: to_vec(&[
                "unbearable",
                "hate this",
                "hate it",
                "worst thing",
                "furious",
                "want to scream",
                "losing my mind",
            ]),
            overwhelm_fallback: to_vec(&[
                "too much",
                "give up",
                "giving up",
                "overwhelmed",
                "drowning",
                "no point trying",
            ]),
            shrink_request: to_vec(&[
                "break it down",
                "break this down",
                "smaller steps",
                "smaller step",
                "smaller piece",
                "make it smaller",
                "make this smaller",
                "one step at a time",
                "tiny step",
            ]),
            emotional: to_vec(&[
                "frustrated",
                "frustrating",
                "boring",
                "bored",
                "annoying",
                "annoyed",
                "pointless",
                "hard",
                "difficult",
                "tired",
                "exhausted",
                "sad",
                "worried",
                "anxious",
                "nervous",
                "stupid",
                "hate",
            ]),
            task: to_vec(&[
                "essay",
                "homework",
                "assignment",
                "paper",
                "worksheet",
                "project",
                "chapter",
                "reading",
                "math",
                "due",
                "write",
                "how do i",
                "help me",
            ]),
        }
    }
}

/// One row of the mirror phrase table: a topic keyword, the hedged and
/// direct phrasings of its mirror, and the topic-specific clarifying
/// question. Rows are priority-ordered; the first keyword hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorRule {
    /// Topic keyword matched against the lowercased input
    pub keyword: String,
    /// Mirror used for Low-certainty input
    pub hedged: String,
    /// Mirror used for Medium/High-certainty input
    pub direct: String,
    /// Topic-specific clarifying question
    pub question: String,
}

impl MirrorRule {
    fn new(keyword: &str, hedged: &str, direct: &str, question: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            hedged: hedged.to_string(),
            direct: direct.to_string(),
            question: question.to_string(),
        }
    }
}

/// The mirror phrase table plus its generic fallback row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorTable {
    /// Priority-ordered topic rows
    pub rules: Vec<MirrorRule>,
    /// Used when no topic keyword matches
    pub fallback: MirrorRule,
}

impl MirrorTable {
    /// Find the first rule whose keyword appears in the (lowercased) text,
    /// falling back to the generic row.
    pub fn lookup(&self, text_lower: &str) -> &MirrorRule {
        self.rules
            .iter()
            .find(|rule| text_lower.contains(rule.keyword.as_str()))
            .unwrap_or(&self.fallback)
    }
}

impl Default for MirrorTable {
    fn default() -> Self {
        Self {
            rules: vec![
                MirrorRule::new(
                    "pointless",
                    "It sounds like this might be feeling pointless right now.",
                    "This is feeling pointless right now.",
                    "What makes it feel most pointless: the topic, or having to do it at all?",
                ),
                MirrorRule::new(
                    "boring",
                    "This might be feeling really boring to sit with.",
                    "This is really boring to sit with.",
                    "Is it boring because it's too easy, or because it's hard to care about?",
                ),
                MirrorRule::new(
                    "confus",
                    "Something about this might not be adding up yet.",
                    "Something about this isn't adding up yet.",
                    "Which part stops making sense first?",
                ),
                MirrorRule::new(
                    "frustrat",
                    "There might be some real frustration built up here.",
                    "There's real frustration built up here.",
                    "What's the most frustrating part?",
                ),
                MirrorRule::new(
                    "hard",
                    "This might be feeling heavier than it looks.",
                    "This is heavier than it looks.",
                    "What about it feels the worst right now?",
                ),
                MirrorRule::new(
                    "tired",
                    "You might just be running low right now.",
                    "You're running low right now.",
                    "Is it the task that's draining, or the day around it?",
                ),
            ],
            fallback: MirrorRule::new(
                "",
                "Something about this might be weighing on you.",
                "Something about this is weighing on you.",
                "What's the main thing making it feel that way?",
            ),
        }
    }
}

/// A directional option offered after an answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionOption {
    /// Button label shown to the user
    pub label: String,
    /// Selecting this direction implies the user wants to act on the task
    pub implies_action: bool,
}

impl DirectionOption {
    fn new(label: &str, implies_action: bool) -> Self {
        Self {
            label: label.to_string(),
            implies_action,
        }
    }
}

fn default_directions() -> Vec<DirectionOption> {
    vec![
        DirectionOption::new("That makes sense", false),
        DirectionOption::new("Talk more about this", false),
        DirectionOption::new("Help me get through the minimum", true),
        DirectionOption::new("Pause for now", false),
    ]
}

/// A content-policy category: keywords plus the canned redirect shown when
/// the category matches. Checked before classification on every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCategory {
    /// Category name (for logging and the caller)
    pub name: String,
    /// Keywords scanned with the same substring rules as classification
    pub keywords: Vec<String>,
    /// Canned redirect message returned instead of a composed response
    pub redirect: String,
}

fn default_policy() -> Vec<PolicyCategory> {
    vec![
        PolicyCategory {
            name: "crisis".to_string(),
            keywords: to_vec(&[
                "kill myself",
                "hurt myself",
                "want to die",
                "end it all",
                "not worth living",
            ]),
            redirect: "That sounds bigger than homework, and it matters more than homework. \
                       Please talk to someone you trust, like a parent, a counselor, or a crisis \
                       line, right now. I'll be here when you come back."
                .to_string(),
        },
        PolicyCategory {
            name: "harm".to_string(),
            keywords: to_vec(&["hurt them", "hurt him", "hurt her", "make them pay"]),
            redirect: "I can't help with that. If you're this angry, that's worth talking \
                       about with someone you trust before doing anything."
                .to_string(),
        },
    ]
}

/// The full rule vocabulary. Loaded once and frozen; see the module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Certainty marker lists
    #[serde(default)]
    pub certainty: CertaintyMarkers,
    /// Classification keyword lists
    #[serde(default)]
    pub vocabulary: ClassificationVocabulary,
    /// Mirror phrase table
    #[serde(default)]
    pub mirrors: MirrorTable,
    /// Directional-option label vocabulary
    #[serde(default = "default_directions")]
    pub directions: Vec<DirectionOption>,
    /// Content-policy categories
    #[serde(default = "default_policy")]
    pub policy: Vec<PolicyCategory>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            certainty: CertaintyMarkers::default(),
            vocabulary: ClassificationVocabulary::default(),
            mirrors: MirrorTable::default(),
            directions: default_directions(),
            policy: default_policy(),
        }
    }
}

impl RuleConfig {
    /// The built-in vocabulary. Also serves as the degraded-mode fallback
    /// when an external config cannot be loaded.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON string. Missing sections fall back to the
    /// built-in vocabulary section-by-section.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file. On any failure the caller should fall
    /// back to [`RuleConfig::builtin`]; [`RuleConfig::load_or_builtin`] does
    /// exactly that.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&raw)
    }

    /// Load a config from a JSON file, degrading to the built-in vocabulary
    /// (with a warning) instead of failing.
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Self {
        match Self::load_from_path(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "rule config unavailable ({}), using built-in vocabulary",
                    e
                );
                Self::builtin()
            }
        }
    }

    /// Whether the (lowercased) text carries an explicit overwhelm marker:
    /// either vocabulary, since both express overwhelm.
    pub fn has_overwhelm_marker(&self, text_lower: &str) -> bool {
        contains_any(text_lower, &self.vocabulary.loss_of_function)
            || contains_any(text_lower, &self.vocabulary.overwhelm_fallback)
    }

    /// Find the directional option with the given label, if configured.
    pub fn direction_by_label(&self, label: &str) -> Option<&DirectionOption> {
        self.directions.iter().find(|d| d.label == label)
    }
}

/// Case-insensitive substring scan. `haystack_lower` must already be
/// lowercased; needles are lowercased per call.
pub(crate) fn contains_any(haystack_lower: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack_lower.contains(needle.to_lowercase().as_str()))
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
