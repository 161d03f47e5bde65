//! # unstuck-core
//!
//! A dialogue orchestration engine for guided task support: short
//! conversational turns that help a user through an assignment, or through
//! the emotional friction around one.
//!
//! ## Core Components
//!
//! - **Classifier**: ordered keyword/pattern cascade mapping a turn to a
//!   [`Signal`] (intent, certainty, loss of function)
//! - **Answer detection**: decides whether a turn resolves the pending
//!   clarifying question, so the system never asks two in a row
//! - **Mode state machine**: a closed [`Mode`] enum whose per-mode field
//!   whitelist is enforced on every composed [`Response`]
//! - **Composer**: one proportionate response per turn: a mirror, at most
//!   one question, a bounded action list
//! - **Planner**: classifies an accepted task and emits its ordered
//!   [`TaskBreakdown`] of guided steps
//! - **Engine**: the synchronous facade wiring the content-policy gate,
//!   composition, and pause/resume together
//!
//! ## Example
//!
//! ```rust,ignore
//! use unstuck_core::{Engine, Mode};
//!
//! let mut engine = Engine::with_builtin_rules();
//!
//! let response = engine.submit("I can't do this, it's too much")?;
//! assert_eq!(response.mode, Mode::Calming);
//!
//! let response = engine.submit("help me write an essay about World War I")?;
//! assert_eq!(response.mode, Mode::Stepping);
//! ```

pub mod answer;
pub mod classifier;
pub mod composer;
pub mod engine;
pub mod error;
pub mod mode;
pub mod persist;
pub mod planner;
pub mod policy;
#[cfg(test)]
mod proptest;
pub mod response;
pub mod rules;
pub mod session;
pub mod signal;

// Re-exports for convenience
pub use answer::{introduces_new_topic, is_answer};
pub use classifier::{classify, detect_certainty, CascadeRule, CASCADE};
pub use composer::generate;
pub use engine::Engine;
pub use error::{Error, Result};
pub use mode::{validate, Mode, Repair};
pub use persist::SessionSnapshot;
pub use planner::{Step, TaskBreakdown, TaskKind};
pub use policy::{ContentPolicy, KeywordPolicy, NoPolicy, PolicyMatch};
pub use response::{Action, Response};
pub use rules::{
    CertaintyMarkers, ClassificationVocabulary, DirectionOption, MirrorRule, MirrorTable,
    PolicyCategory, RuleConfig,
};
pub use session::{ConversationContext, ConversationTurn, Session, TaskState};
pub use signal::{Certainty, Signal, SignalType};
