//! Property-based tests for the orchestration invariants using proptest.
//!
//! These tests verify the contract-level guarantees that unit tests only
//! spot-check:
//!
//! - `submit` is total on non-empty input and always yields a valid shape
//! - classification is pure over (text, prior mode)
//! - `validate` is idempotent at the value level on arbitrary responses
//! - action ids are well-formed kebab-case
//! - the pause payload round-trips losslessly

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::classifier::classify;
    use crate::engine::Engine;
    use crate::mode::{validate, Mode};
    use crate::persist::SessionSnapshot;
    use crate::response::{kebab_case, Action, Response};
    use crate::rules::RuleConfig;

    fn mode() -> impl Strategy<Value = Mode> {
        prop_oneof![
            Just(Mode::Listening),
            Just(Mode::Clarifying),
            Just(Mode::OfferingDirection),
            Just(Mode::Calming),
            Just(Mode::Stepping),
        ]
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            "[A-Za-z][A-Za-z ]{0,15}".prop_map(Action::new),
            Just(Action::new("Pause")),
            Just(Action::new("Come back later")),
        ]
    }

    fn arbitrary_response() -> impl Strategy<Value = Response> {
        (
            mode(),
            ".{0,40}",
            proptest::option::of(".{0,30}"),
            proptest::collection::vec(action(), 0..6),
        )
            .prop_map(|(mode, message, question, actions)| Response {
                mode,
                message,
                question,
                actions,
            })
    }

    proptest! {
        /// Non-empty input never errors and never produces an invalid shape.
        #[test]
        fn submit_is_total_on_nonempty_input(input in "\\PC{1,80}") {
            prop_assume!(!input.trim().is_empty());

            let mut engine = Engine::with_builtin_rules();
            let response = engine.submit(&input).expect("submit must be total");

            let (revalidated, repairs) = validate(response.clone());
            prop_assert_eq!(revalidated, response);
            prop_assert!(repairs.is_empty());
        }

        /// Identical (text, prior mode) always classifies identically.
        #[test]
        fn classification_is_pure(input in "\\PC{1,80}", prior in mode()) {
            let rules = RuleConfig::builtin();
            let first = classify(&input, prior, &rules);
            let second = classify(&input, prior, &rules);
            prop_assert_eq!(first, second);
        }

        /// Validating the output of validate changes nothing.
        #[test]
        fn validate_is_idempotent_at_value_level(response in arbitrary_response()) {
            let (first, _) = validate(response);
            let (second, _) = validate(first.clone());
            prop_assert_eq!(second, first);
        }

        /// Clarifying never carries actions; Stepping never carries a
        /// question, regardless of what the input response claimed.
        #[test]
        fn forbidden_fields_never_survive(response in arbitrary_response()) {
            let (validated, _) = validate(response);
            match validated.mode {
                Mode::Clarifying => prop_assert!(validated.actions.is_empty()),
                Mode::Stepping => prop_assert!(validated.question.is_none()),
                Mode::Calming => {
                    prop_assert!(validated.actions.iter().all(|a| a.is_pause_class()));
                }
                _ => {}
            }
        }

        /// Kebab ids contain only lowercase alphanumerics and single
        /// interior hyphens.
        #[test]
        fn kebab_ids_are_well_formed(label in "\\PC{0,30}") {
            let id = kebab_case(&label);
            prop_assert!(id.chars().all(|c| !c.is_ascii_uppercase() && !c.is_whitespace()));
            prop_assert!(!id.starts_with('-'));
            prop_assert!(!id.ends_with('-'));
            prop_assert!(!id.contains("--"));
        }

        /// The pause payload survives serialization unchanged.
        #[test]
        fn snapshot_roundtrip(
            original in "\\PC{1,40}",
            answers in proptest::collection::vec(".{0,20}", 0..4),
            index in 0usize..10,
        ) {
            let snapshot = SessionSnapshot {
                original_input: original,
                answers,
                current_step_index: index,
                checklist_progress: Default::default(),
            };
            let json = snapshot.to_json().unwrap();
            let back = SessionSnapshot::from_json(&json).unwrap();
            prop_assert_eq!(back, snapshot);
        }
    }
}
