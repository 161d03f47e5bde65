//! Response composition: one proportionate response per turn.
//!
//! `generate` classifies the turn, appends it to the session, and dispatches
//! to exactly one mode-specific branch. The answer path (a turn that
//! resolves the pending clarifying question) overrides signal-keyed dispatch
//! entirely; that override has top priority. Every branch that renders a
//! mirror or question selects phrasing by certainty level: the direct form
//! is never rendered for Low-certainty input, and vice versa.
//!
//! No-stacking is structural: each mode's field whitelist already forbids
//! mixing reassurance, questions, and multiple actions, so no branch needs
//! an ad hoc guard. [`validate`](crate::mode::validate) runs on every
//! composed response before it leaves the engine.

use crate::answer;
use crate::classifier;
use crate::planner::{self, TaskBreakdown};
use crate::response::{kebab_case, Action, Response};
use crate::rules::RuleConfig;
use crate::session::{ConversationTurn, Session, TaskState};
use crate::signal::{Certainty, Signal, SignalType};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static READINESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ready|let'?s start|let'?s go|i'?ll start)\b").expect("invalid regex")
});

static DIRECT_REQUEST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(help me (write|start|do|finish|read)|how do i|show me|where do i start)\b")
        .expect("invalid regex")
});

/// Action ids that imply the user wants to act, independent of the
/// configured direction vocabulary.
const ACTION_IMPLYING_IDS: &[&str] = &["start-this-step", "make-this-smaller", "make-it-smaller"];

/// Compose the single response for one turn.
///
/// Classifies, appends the turn, dispatches to one branch, records the
/// question flags on the turn that produced them, and sets the session's
/// mode from the composed response.
pub fn generate(text: &str, session: &mut Session, rules: &RuleConfig) -> Response {
    let signal = classifier::classify(text, session.mode, rules);
    let prior = session.context.last_turn().cloned();
    session.context.push_turn(ConversationTurn::new(text, signal));

    let response = if answer::is_answer(text, prior.as_ref()) {
        handle_answer(text, signal, session, rules)
    } else {
        match (signal.signal_type, signal.loss_of_function) {
            (SignalType::Overwhelmed, true) => calming_response(),
            (SignalType::Overwhelmed, false) | (SignalType::IntenseEmotion, _) => {
                function_check(signal.certainty)
            }
            (SignalType::Emotional, _) => emotional_mirror(text, signal.certainty, rules),
            (SignalType::Explanatory, _) => explanatory_narrowing(signal.certainty),
            (SignalType::RequestToShrink, _) => shrink_transition(),
            (SignalType::ReadyForAction, _) => next_step(text, session, rules),
        }
    };

    if let Some(question) = &response.question {
        if let Some(turn) = session.context.last_turn_mut() {
            turn.set_question(question.clone());
        }
    }
    session.mode = response.mode;
    debug!("turn composed in mode {}", response.mode);

    let (validated, _repairs) = crate::mode::validate(response);
    validated
}

/// The answer path: mirror the user's own words, acknowledge briefly, and
/// offer directions. Never asks a question. Routes to Stepping when the
/// answer itself signals readiness, else OfferingDirection.
fn handle_answer(text: &str, signal: Signal, session: &mut Session, rules: &RuleConfig) -> Response {
    let trimmed = text.trim();
    let mirror = format!("\"{}\". Okay, that tells me where this is stuck.", trimmed);

    if signals_readiness(text) {
        let step_payload = step_payload(text, session, rules);
        let message = format!("{}\n{}", mirror, step_payload);
        return Response::stepping(
            message,
            vec![Action::new("Start this step"), Action::new("Make it smaller")],
        );
    }

    let text_lower = text.to_lowercase();
    let include_pause = rules.has_overwhelm_marker(&text_lower);
    let actions: Vec<Action> = rules
        .directions
        .iter()
        .filter(|d| include_pause || !d.label.eq_ignore_ascii_case("Pause for now"))
        .take(4)
        .map(|d| Action::new(d.label.clone()))
        .collect();

    // Low-certainty answers get a softer handoff sentence.
    let lead = if signal.certainty.is_hedged() {
        "We can take this in whichever direction feels possible."
    } else {
        "Pick whichever direction you want."
    };
    Response::offering_direction(format!("{} {}", mirror, lead), actions)
}

/// Overwhelmed with loss of function: one agency-preserving sentence and
/// pause-class actions only.
fn calming_response() -> Response {
    Response::calming("You can pause whenever you want. Nothing here expires.")
}

/// Overwhelmed without loss of function, or intense emotion: reflect the
/// intensity as information and ask exactly one function-check question.
fn function_check(certainty: Certainty) -> Response {
    let message = if certainty.is_hedged() {
        "When something starts to feel this big, it might be colliding with something that matters to you."
    } else {
        "When something feels unbearable, it's often colliding with something important."
    };
    Response::clarifying(
        message,
        "Are you still able to think, or do you want to slow things down?",
    )
}

/// Emotional: certainty-matched mirror from the phrase table plus its
/// topic-specific clarifying question.
fn emotional_mirror(text: &str, certainty: Certainty, rules: &RuleConfig) -> Response {
    let rule = rules.mirrors.lookup(&text.to_lowercase());
    let message = if certainty.is_hedged() {
        rule.hedged.clone()
    } else {
        rule.direct.clone()
    };
    Response::clarifying(message, rule.question.clone())
}

/// Explanatory: reflect the meaning and narrow with at most two
/// interpretive branches, both already implied by the user's framing.
fn explanatory_narrowing(certainty: Certainty) -> Response {
    let message = if certainty.is_hedged() {
        "It sounds like there might be a reason underneath this."
    } else {
        "So there's a reason underneath this. It's not coming from nowhere."
    };
    Response::clarifying(
        message,
        "Is it more about the task itself, or about what's around it?",
    )
}

/// RequestToShrink: a permission-phrased transition with the two implied
/// directions as actions. No question.
fn shrink_transition() -> Response {
    Response::offering_direction(
        "Want to keep going, or make this into one tiny step?",
        vec![Action::new("Keep going"), Action::new("Make this smaller")],
    )
}

/// ReadyForAction: surface the first (or next) step. Start/shrink actions
/// appear only when readiness is demonstrated, not presumed.
fn next_step(text: &str, session: &mut Session, rules: &RuleConfig) -> Response {
    let first_turn = session.context.len() == 1;
    let payload = step_payload(text, session, rules);

    let ready = signals_readiness(text)
        || session
            .context
            .last_selected_direction()
            .map(|id| direction_implies_action(id, rules))
            .unwrap_or(false)
        || (first_turn && DIRECT_REQUEST_PATTERN.is_match(text));

    let actions = if ready {
        vec![Action::new("Start this step"), Action::new("Make it smaller")]
    } else {
        Vec::new()
    };
    Response::stepping(payload, actions)
}

/// Render the current step of the (possibly new) task as the message
/// payload. The breakdown is regenerated from the current input every time,
/// not cached across overwhelm-state changes.
fn step_payload(text: &str, session: &mut Session, rules: &RuleConfig) -> String {
    let task = session
        .task
        .get_or_insert_with(|| TaskState::new(text, planner::classify(text)));
    let breakdown = planner::generate(text, task.kind, rules);
    let index = task.current_step_index.min(breakdown.steps.len() - 1);
    render_step(&breakdown, index)
}

fn render_step(breakdown: &TaskBreakdown, index: usize) -> String {
    let step = &breakdown.steps[index];
    let mut payload = String::new();
    if index == 0 {
        payload.push_str(&breakdown.persona_message);
        payload.push(' ');
        payload.push_str(&breakdown.how_to_start);
        payload.push('\n');
    }
    payload.push_str(&format!(
        "Step {} of {}: {}. {}",
        index + 1,
        breakdown.steps.len(),
        step.title,
        step.description
    ));
    if let Some(prompt) = &step.input_prompt {
        payload.push('\n');
        payload.push_str(prompt);
    }
    payload
}

/// Help/how-to phrasing or an explicit readiness phrase.
fn signals_readiness(text: &str) -> bool {
    READINESS_PATTERN.is_match(text) || DIRECT_REQUEST_PATTERN.is_match(text)
}

/// Whether a selected direction id implies the user wants to act.
fn direction_implies_action(action_id: &str, rules: &RuleConfig) -> bool {
    ACTION_IMPLYING_IDS.contains(&action_id)
        || rules
            .directions
            .iter()
            .any(|d| d.implies_action && kebab_case(&d.label) == action_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use pretty_assertions::assert_eq;

    fn setup() -> (Session, RuleConfig) {
        (Session::new(), RuleConfig::builtin())
    }

    #[test]
    fn test_loss_of_function_goes_calming() {
        let (mut session, rules) = setup();
        let response = generate("I can't do this, it's too much", &mut session, &rules);

        assert_eq!(response.mode, Mode::Calming);
        assert!(response.question.is_none());
        assert!(response.actions.iter().all(|a| a.is_pause_class()));
        assert_eq!(session.mode, Mode::Calming);
    }

    #[test]
    fn test_intensity_gets_function_check() {
        let (mut session, rules) = setup();
        let response = generate("this is unbearable", &mut session, &rules);

        assert_eq!(response.mode, Mode::Clarifying);
        assert!(response.question.is_some());
        assert!(response.actions.is_empty());
        assert!(response.message.contains("colliding with something important"));
    }

    #[test]
    fn test_low_certainty_renders_hedged_mirror() {
        let (mut session, rules) = setup();
        let response = generate("this feels kind of pointless", &mut session, &rules);

        assert_eq!(response.mode, Mode::Clarifying);
        assert!(response.message.contains("might"));
        assert!(!response.message.starts_with("This is"));
    }

    #[test]
    fn test_direct_mirror_for_medium_certainty() {
        let (mut session, rules) = setup();
        let response = generate("this homework is pointless", &mut session, &rules);

        assert_eq!(response.mode, Mode::Clarifying);
        assert!(!response.message.contains("might"));
    }

    #[test]
    fn test_question_flags_recorded_on_turn() {
        let (mut session, rules) = setup();
        let response = generate("so frustrated with this", &mut session, &rules);

        let turn = session.context.last_turn().unwrap();
        assert!(turn.had_question);
        assert_eq!(turn.last_question, response.question);
    }

    #[test]
    fn test_answer_path_overrides_signal_dispatch() {
        let (mut session, rules) = setup();
        generate("this essay is so hard", &mut session, &rules);
        assert_eq!(session.mode, Mode::Clarifying);

        let response = generate("the reading is just confusing", &mut session, &rules);
        assert_ne!(response.mode, Mode::Clarifying);
        assert!(response.question.is_none());
        assert!(response.message.contains("the reading is just confusing"));
        assert!(response.actions.len() >= 2);
    }

    #[test]
    fn test_answer_path_pause_needs_overwhelm_marker() {
        let (mut session, rules) = setup();
        generate("this essay is so hard", &mut session, &rules);
        let response = generate("the reading is just confusing", &mut session, &rules);

        assert!(response
            .actions
            .iter()
            .all(|a| a.label != "Pause for now"));
    }

    #[test]
    fn test_shrink_request_offers_two_directions() {
        let (mut session, rules) = setup();
        let response = generate("can you break it down for me", &mut session, &rules);

        assert_eq!(response.mode, Mode::OfferingDirection);
        assert!(response.question.is_none());
        assert_eq!(response.actions.len(), 2);
        assert!(response
            .actions
            .iter()
            .any(|a| a.action_id == "make-this-smaller"));
    }

    #[test]
    fn test_first_turn_direct_request_gets_start_action() {
        let (mut session, rules) = setup();
        let response = generate("help me write an essay about World War I", &mut session, &rules);

        assert_eq!(response.mode, Mode::Stepping);
        assert!(response.question.is_none());
        assert!(response
            .actions
            .iter()
            .any(|a| a.action_id == "start-this-step"));
    }

    #[test]
    fn test_plain_task_mention_gets_no_actions() {
        let (mut session, rules) = setup();
        // Task keyword, but no readiness phrase and not a direct request.
        let response = generate("the essay topic got posted today", &mut session, &rules);

        assert_eq!(response.mode, Mode::Stepping);
        assert!(response.actions.is_empty());
    }

    #[test]
    fn test_selected_direction_unlocks_actions() {
        let (mut session, rules) = setup();
        generate("the essay topic got posted today", &mut session, &rules);
        session
            .context
            .last_turn_mut()
            .unwrap()
            .selected_direction = Some("help-me-get-through-the-minimum".to_string());

        let response = generate("essay time I suppose", &mut session, &rules);
        assert_eq!(response.mode, Mode::Stepping);
        assert!(!response.actions.is_empty());
    }

    #[test]
    fn test_explanatory_narrows_without_new_framing() {
        let (mut session, rules) = setup();
        let response = generate(
            "the problem is nobody explained the instructions",
            &mut session,
            &rules,
        );

        assert_eq!(response.mode, Mode::Clarifying);
        let question = response.question.unwrap();
        // At most two interpretive branches.
        assert!(question.matches(", or ").count() <= 1);
    }

    #[test]
    fn test_composed_responses_always_pass_validation() {
        let (mut session, rules) = setup();
        let inputs = [
            "I can't think",
            "this is unbearable",
            "so boring",
            "because the teacher said so",
            "break it down",
            "help me write an essay",
            "ok",
        ];
        for input in inputs {
            let response = generate(input, &mut session, &rules);
            let (revalidated, repairs) = crate::mode::validate(response.clone());
            assert_eq!(revalidated, response, "input: {input}");
            assert!(repairs.is_empty(), "input: {input}");
        }
    }
}
