//! Integration tests for the runner: lifecycle, markers, outcome accounting and exit status.

use std::cell::RefCell;
use std::rc::Rc;

use tally::cli::ExitCode;
use tally::cli::commands::exit_code;
use tally::reporter::SilentReporter;
use tally::{ErrorKind, FailureKind, Outcome, Registry, RunConfig, RunResult, Runner, TallyError, TestCase};

type Log = Rc<RefCell<Vec<String>>>;

fn run(registry: &Registry) -> RunResult {
    Runner::default().run(registry, &mut SilentReporter)
}

fn run_with(registry: &Registry, config: RunConfig) -> RunResult {
    Runner::new(config).run(registry, &mut SilentReporter)
}

fn push(log: &Log, entry: &str) {
    log.borrow_mut().push(entry.to_string());
}

/// A case whose hooks and bodies write to a shared log.
fn logged_case(log: &Log) -> TestCase<String> {
    let (setup_log, teardown_log) = (Rc::clone(log), Rc::clone(log));
    let (first_log, second_log) = (Rc::clone(log), Rc::clone(log));
    TestCase::with_setup("Logged", move || {
        push(&setup_log, "setup");
        Ok(String::from("fixture"))
    })
    .teardown(move |fixture| {
        push(&teardown_log, &format!("teardown {fixture}"));
        Ok(())
    })
    .test("first", move |t, fixture| {
        push(&first_log, "first");
        fixture.push_str(" (mutated)");
        t.assert_true(true, "")
    })
    .test("second", move |t, fixture| {
        push(&second_log, "second");
        t.assert_eq(fixture.as_str(), "fixture", "setup builds a fresh fixture")
    })
}

#[test]
fn test_setup_and_teardown_wrap_every_method() {
    let log: Log = Rc::default();
    let result = run(&Registry::new().with(logged_case(&log)));

    assert!(result.was_successful());
    assert_eq!(
        *log.borrow(),
        vec![
            "setup",
            "first",
            "teardown fixture (mutated)",
            "setup",
            "second",
            "teardown fixture",
        ]
    );
}

#[test]
fn test_skipped_method_never_executes() {
    let log: Log = Rc::default();
    let (setup_log, body_log) = (Rc::clone(&log), Rc::clone(&log));
    let registry = Registry::new().with(
        TestCase::with_setup("Skips", move || {
            push(&setup_log, "setup");
            Ok(())
        })
        .skip("test_heavy", "long running", move |_, _| {
            push(&body_log, "body");
            Ok(())
        }),
    );

    let result = run(&registry);
    assert!(log.borrow().is_empty());
    assert_eq!(result.count(Outcome::Skipped), 1);
    assert_eq!(result.reports()[0].reason.as_deref(), Some("long running"));
    assert!(result.was_successful());
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn test_expected_failure_that_fails_is_success() {
    let registry = Registry::new().with(
        TestCase::new("Known").expected_failure("test_known_bug", |t, _| t.assert_eq(1 + 1, 3, "")),
    );
    let result = run(&registry);

    assert_eq!(result.count(Outcome::ExpectedFailure), 1);
    assert!(result.failures().is_empty());
    assert_eq!(result.expected_failures().len(), 1);
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn test_expected_failure_that_passes_fails_the_run() {
    let registry = Registry::new().with(
        TestCase::new("Fixed").expected_failure("test_fixed_bug", |t, _| t.assert_eq(1 + 1, 2, "")),
    );
    let result = run(&registry);

    assert_eq!(result.count(Outcome::UnexpectedSuccess), 1);
    assert_eq!(result.failures()[0].kind, FailureKind::UnexpectedSuccess);
    assert_eq!(exit_code(&result), ExitCode::FAILURE);
}

#[test]
fn test_setup_fault_errors_without_body_or_teardown() {
    let log: Log = Rc::default();
    let (body_log, teardown_log) = (Rc::clone(&log), Rc::clone(&log));
    let registry = Registry::new().with(
        TestCase::with_setup("NoDatabase", || -> Result<(), tally::Fault> {
            Err(TallyError::with_message(ErrorKind::RuntimeError, "connection refused").into())
        })
        .teardown(move |()| {
            push(&teardown_log, "teardown");
            Ok(())
        })
        .expected_failure("test_query", move |_, _| {
            push(&body_log, "body");
            Ok(())
        }),
    );

    let result = run(&registry);
    assert!(log.borrow().is_empty());
    assert_eq!(result.count(Outcome::Errored), 1);
    let failure = &result.failures()[0];
    assert_eq!(failure.kind, FailureKind::Setup);
    assert_eq!(failure.message, "RuntimeError: connection refused");
}

#[test]
fn test_panicking_body_is_errored_and_run_continues() {
    let registry = Registry::new().with(
        TestCase::new("Panics")
            .test("test_explodes", |_, _| panic!("index out of range"))
            .test("test_after", |t, _| t.assert_true(true, "")),
    );
    let result = run(&registry);

    assert_eq!(result.report("Panics", "test_explodes").unwrap().outcome, Outcome::Errored);
    assert_eq!(result.report("Panics", "test_after").unwrap().outcome, Outcome::Passed);
    let failure = &result.failures()[0];
    assert_eq!(failure.kind, FailureKind::Error);
    assert_eq!(failure.message, "panicked: index out of range");
    assert_eq!(failure.code.as_deref(), Some("tally::panic"));
}

#[test]
fn test_soft_assertions_report_every_failure() {
    let registry = Registry::new().with(TestCase::new("Soft").test("test_many", |t, _| {
        t.assert_eq(1, 2, "first")?;
        t.assert_true(true, "")?;
        t.assert_eq("a", "b", "second")
    }));
    let result = run(&registry);

    let report = &result.reports()[0];
    assert_eq!(report.outcome, Outcome::Failed);
    assert_eq!(report.checks, 3);
    let notes: Vec<_> = result.failures().iter().map(|f| f.note.clone().unwrap()).collect();
    assert_eq!(notes, vec!["first", "second"]);
    assert!(result.failures()[0].location.as_ref().unwrap().starts_with("tests/runner_semantics.rs:"));
}

#[test]
fn test_counts_always_sum_to_total() {
    let registry = tally::samples::suites::registry();
    let result = run(&registry);

    let sum: usize = result.counts().map(|(_, n)| n).sum();
    assert_eq!(sum, result.total());
    assert_eq!(result.total(), result.reports().len());
    assert_eq!(result.total(), 12);
    assert!(result.was_successful());
}

#[test]
fn test_declaration_and_registration_order() {
    let registry = Registry::new()
        .with(TestCase::new("B").test("z", |_, _| Ok(())).test("a", |_, _| Ok(())))
        .with(TestCase::new("A").test("m", |_, _| Ok(())));
    let result = run(&registry);

    let paths: Vec<_> = result.reports().iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec!["B::z", "B::a", "A::m"]);
}

#[test]
fn test_scope_and_keyword_selection() {
    let registry = tally::samples::suites::registry();

    let result = run_with(&registry, RunConfig::new().with_scopes(["TestMathFunctions.test_divide_normal"]));
    assert_eq!(result.total(), 1);

    let result = run_with(&registry, RunConfig::new().with_keyword("greet"));
    assert_eq!(result.total(), 2);

    let result = run_with(&registry, RunConfig::new().with_keyword("does_not_exist"));
    assert_eq!(result.total(), 0);
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn test_fail_fast_stops_after_unexpected_success() {
    let registry = Registry::new().with(
        TestCase::new("Fast")
            .expected_failure("test_fixed", |_, _| Ok(()))
            .test("test_never_reached", |_, _| Ok(())),
    );
    let result = run_with(&registry, RunConfig::new().with_fail_fast(true));
    assert_eq!(result.total(), 1);
    assert!(result.report("Fast", "test_never_reached").is_none());
}
