//! The orchestration facade: one synchronous turn at a time.
//!
//! An [`Engine`] owns the frozen rule vocabulary, the content-policy gate,
//! and one [`Session`]. `submit` is the only way a turn enters the core:
//! empty input is rejected before anything else, the policy gate may
//! short-circuit with its canned redirect, and everything that gets past
//! both is composed and validated. Given non-empty text, `submit` is total;
//! no error escapes composition.
//!
//! The engine is single-writer by construction: it takes `&mut self` per
//! turn, so a response callback cannot re-enter `submit` mid-composition.
//! "Pause" is not preemption: it is an ordinary action result after which
//! the caller simply stops submitting turns until resume.

use crate::composer;
use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::persist::SessionSnapshot;
use crate::planner::{self, TaskBreakdown};
use crate::policy::{ContentPolicy, KeywordPolicy};
use crate::response::Response;
use crate::rules::RuleConfig;
use crate::session::Session;
use tracing::{debug, info};

/// Dialogue orchestration engine for one conversation.
pub struct Engine {
    rules: RuleConfig,
    policy: Box<dyn ContentPolicy>,
    session: Session,
}

impl Engine {
    /// Create an engine with the given rules and the default keyword
    /// policy built from them.
    pub fn new(rules: RuleConfig) -> Self {
        let policy = Box::new(KeywordPolicy::from_rules(&rules));
        Self {
            rules,
            policy,
            session: Session::new(),
        }
    }

    /// Create an engine with the built-in rule vocabulary.
    pub fn with_builtin_rules() -> Self {
        Self::new(RuleConfig::builtin())
    }

    /// Replace the content-policy gate.
    pub fn with_policy(mut self, policy: Box<dyn ContentPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Process one turn and return the single composed response.
    ///
    /// Errors only on empty input. A content-policy match returns the
    /// category's canned redirect without classifying or recording the turn.
    pub fn submit(&mut self, text: &str) -> Result<Response> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        if let Some(hit) = self.policy.check(text) {
            info!("content policy matched category '{}', redirecting", hit.category);
            self.session.mode = Mode::Listening;
            return Ok(Response::listening(hit.redirect));
        }

        Ok(composer::generate(text, &mut self.session, &self.rules))
    }

    /// Record the directional action the user selected after the latest
    /// turn. Feeds the readiness gating of subsequent Stepping responses.
    pub fn choose_direction(&mut self, action_id: impl Into<String>) {
        let action_id = action_id.into();
        debug!("direction selected: {}", action_id);
        if let Some(turn) = self.session.context.last_turn_mut() {
            turn.selected_direction = Some(action_id);
        }
    }

    /// Advance to the next step, optionally recording the answer the
    /// current step collected. Saturates at the final step.
    pub fn advance_step(&mut self, answer: Option<&str>) {
        let step_count = self.breakdown().map(|b| b.steps.len());
        if let (Some(task), Some(count)) = (self.session.task.as_mut(), step_count) {
            if let Some(answer) = answer {
                task.answers.push(answer.to_string());
            }
            task.current_step_index = (task.current_step_index + 1).min(count - 1);
        }
    }

    /// Record checklist completion for a step of the current task.
    pub fn set_checklist_progress(&mut self, step_index: usize, items: Vec<bool>) {
        if let Some(task) = self.session.task.as_mut() {
            task.checklist_progress.insert(step_index, items);
        }
    }

    /// The breakdown for the current task, regenerated on demand from the
    /// original input. Never cached.
    pub fn breakdown(&self) -> Option<TaskBreakdown> {
        self.session
            .task
            .as_ref()
            .map(|task| planner::generate(&task.original_input, task.kind, &self.rules))
    }

    /// Capture the persistence payload for a pause.
    pub fn pause(&self) -> Result<SessionSnapshot> {
        let task = self
            .session
            .task
            .as_ref()
            .ok_or_else(|| Error::snapshot("no task in flight to pause"))?;
        info!("session {} paused at step {}", self.session.id, task.current_step_index);
        Ok(SessionSnapshot::capture(task))
    }

    /// Resume a paused task from its snapshot. The session re-enters
    /// Stepping; steps come back from regeneration, not storage.
    pub fn resume(&mut self, snapshot: &SessionSnapshot) {
        info!("session {} resumed at step {}", self.session.id, snapshot.current_step_index);
        self.session.task = Some(snapshot.restore());
        self.session.mode = Mode::Stepping;
    }

    /// Start over: history, task progress, and mode are dropped.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// The engine's session state (read-only).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The frozen rule vocabulary.
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}
