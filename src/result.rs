//! Accumulated results of a run.
//!
//! [`RunResult`] keeps one [`MethodReport`] per executed method and a count per [`Outcome`]; the
//! two are updated together so `total()` always equals both the number of reports and the sum of
//! the counts. Failures and errors land in an ordered log of [`FailureRecord`]s.

use std::fmt;
use std::time::Duration;

use miette::Diagnostic;
use tally_core::{Label, Outcome};

use crate::context::Check;
use crate::fault::Fault;

/// Where a logged failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// An expectation was not met.
    Assertion,
    /// The body propagated an error or panicked.
    Error,
    /// The setup hook faulted; body and teardown never ran.
    Setup,
    /// The teardown hook faulted.
    Teardown,
    /// The method passed despite its expected-failure marker.
    UnexpectedSuccess,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Assertion => "assertion",
            FailureKind::Error => "error",
            FailureKind::Setup => "setup",
            FailureKind::Teardown => "teardown",
            FailureKind::UnexpectedSuccess => "unexpected_success",
        }
    }

    /// Heading used by the console reporter (`FAIL` or `ERROR`).
    pub fn heading(self) -> &'static str {
        match self {
            FailureKind::Assertion | FailureKind::UnexpectedSuccess => "FAIL",
            FailureKind::Error | FailureKind::Setup | FailureKind::Teardown => "ERROR",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the failure log.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub case: String,
    pub method: String,
    /// Sub-case label, when the failure happened inside one.
    pub label: Option<Label>,
    pub kind: FailureKind,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub note: Option<String>,
    /// `file:line:column` of the failing call, when known.
    pub location: Option<String>,
    /// Diagnostic code such as `tally::assertion_failure`.
    pub code: Option<String>,
}

impl FailureRecord {
    pub fn from_check(case: &str, method: &str, check: &Check) -> Option<Self> {
        let failure = check.failure.as_ref()?;
        Some(Self {
            case: case.to_string(),
            method: method.to_string(),
            label: check.label.clone(),
            kind: FailureKind::Assertion,
            message: failure.message.clone(),
            expected: failure.expected.clone(),
            actual: failure.actual.clone(),
            note: failure.note.clone(),
            location: Some(failure.location.to_string()),
            code: failure.code().map(|c| c.to_string()),
        })
    }

    pub fn from_fault(case: &str, method: &str, label: Option<Label>, kind: FailureKind, fault: &Fault) -> Self {
        let (expected, actual, note) = match fault {
            Fault::Assertion(failure) => (
                failure.expected.clone(),
                failure.actual.clone(),
                failure.note.clone(),
            ),
            _ => (None, None, None),
        };
        Self {
            case: case.to_string(),
            method: method.to_string(),
            label,
            kind,
            message: fault.to_string(),
            expected,
            actual,
            note,
            location: fault.location(),
            code: fault.code().map(|c| c.to_string()),
        }
    }

    pub fn unexpected_success(case: &str, method: &str) -> Self {
        Self {
            case: case.to_string(),
            method: method.to_string(),
            label: None,
            kind: FailureKind::UnexpectedSuccess,
            message: "unexpected success".to_string(),
            expected: None,
            actual: None,
            note: None,
            location: None,
            code: None,
        }
    }
}

/// Outcome and bookkeeping of one executed method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub case: String,
    pub method: String,
    pub outcome: Outcome,
    pub duration: Duration,
    /// Skip or expected-failure reason.
    pub reason: Option<String>,
    /// Assertions recorded by the method.
    pub checks: usize,
    pub subcases: usize,
}

impl MethodReport {
    /// `Case::method`, the path selectors and keyword filters match against.
    pub fn path(&self) -> String {
        format!("{}::{}", self.case, self.method)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    counts: [usize; Outcome::ALL.len()],
    reports: Vec<MethodReport>,
    failures: Vec<FailureRecord>,
    expected_failures: Vec<FailureRecord>,
    duration: Duration,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished method together with the failures it logged.
    ///
    /// `expected` holds the failures an expected-failure method predicted; they are kept apart so
    /// they never read as problems.
    pub fn record(&mut self, report: MethodReport, failures: Vec<FailureRecord>, expected: Vec<FailureRecord>) {
        self.counts[report.outcome.index()] += 1;
        self.reports.push(report);
        self.failures.extend(failures);
        self.expected_failures.extend(expected);
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Number of methods that reached a terminal state.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.counts[outcome.index()]
    }

    /// Every outcome with its count, in reporting order.
    pub fn counts(&self) -> impl Iterator<Item = (Outcome, usize)> + '_ {
        Outcome::ALL.iter().map(|&o| (o, self.count(o)))
    }

    /// Check whether the run contains no failed, errored or unexpectedly successful method.
    pub fn was_successful(&self) -> bool {
        Outcome::ALL
            .iter()
            .filter(|o| o.fails_run())
            .all(|&o| self.count(o) == 0)
    }

    pub fn reports(&self) -> &[MethodReport] {
        &self.reports
    }

    /// Failures and errors, in the order they happened.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn expected_failures(&self) -> &[FailureRecord] {
        &self.expected_failures
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Report for `Case::method`, if it ran.
    pub fn report(&self, case: &str, method: &str) -> Option<&MethodReport> {
        self.reports
            .iter()
            .find(|r| r.case == case && r.method == method)
    }
}
