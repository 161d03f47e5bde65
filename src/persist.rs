//! The pause/resume payload handed to the persistence collaborator.
//!
//! Only step *progress* is persisted: the original input, collected
//! answers, the current step index, and checklist completion. Steps
//! themselves are never stored; they are regenerated deterministically from
//! `(original_input, kind)` when the session resumes.

use crate::error::Result;
use crate::planner;
use crate::session::TaskState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to resume a paused task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The input the task was accepted from
    pub original_input: String,
    /// Answers collected from input steps so far
    pub answers: Vec<String>,
    /// Index of the step the user paused on
    pub current_step_index: usize,
    /// Checklist completion per step index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checklist_progress: BTreeMap<usize, Vec<bool>>,
}

impl SessionSnapshot {
    /// Capture progress from a task in flight.
    pub fn capture(task: &TaskState) -> Self {
        Self {
            original_input: task.original_input.clone(),
            answers: task.answers.clone(),
            current_step_index: task.current_step_index,
            checklist_progress: task.checklist_progress.clone(),
        }
    }

    /// Rebuild task state. The kind is re-derived from the original input,
    /// which is what makes step regeneration deterministic.
    pub fn restore(&self) -> TaskState {
        let mut task = TaskState::new(&self.original_input, planner::classify(&self.original_input));
        task.answers = self.answers.clone();
        task.current_step_index = self.current_step_index;
        task.checklist_progress = self.checklist_progress.clone();
        task
    }

    /// Serialize for the persistence collaborator.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a payload produced by [`SessionSnapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
