//! Integration tests for the `tally_core` vocabulary.
//!
//! These lock in the user-facing spellings the runner and reporters rely on (progress codes,
//! verbose tags, label rendering) and the rule deciding whether a run is successful.

use proptest::prelude::*;
use tally_core::{Label, MethodState, Outcome};

#[test]
/// Only failures, errors and unexpected successes make a run unsuccessful; expected failures and
/// skips are acceptable terminal states.
fn run_success_rule_over_all_outcomes() {
    let failing: Vec<Outcome> = Outcome::ALL.into_iter().filter(|o| o.fails_run()).collect();
    assert_eq!(
        failing,
        vec![Outcome::Failed, Outcome::Errored, Outcome::UnexpectedSuccess]
    );
}

#[test]
fn progress_codes_are_distinct() {
    let mut codes: Vec<char> = Outcome::ALL.iter().map(|o| o.short_code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), Outcome::ALL.len());
}

#[test]
fn every_outcome_but_skipped_is_reached_through_running() {
    for outcome in Outcome::ALL {
        let via_running = MethodState::Pending
            .start()
            .and_then(|s| s.finish(outcome));
        assert_eq!(via_running.is_ok(), outcome != Outcome::Skipped, "{outcome}");
    }
}

proptest! {
    /// Property: a label renders every pair, in insertion order, inside one pair of parentheses.
    #[test]
    fn label_renders_pairs_in_order(values in proptest::collection::vec(-1000i64..1000, 0..6)) {
        let label: Label = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("k{i}"), *v))
            .collect();
        let rendered = label.to_string();
        let expected = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("k{i}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        prop_assert_eq!(rendered, format!("({expected})"));
    }
}
