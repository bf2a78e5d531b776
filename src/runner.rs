//! Sequential execution of registered suites.
//!
//! Every selected method walks the [`MethodState`] lifecycle exactly once. Skip-marked methods go
//! straight from `Pending` to `Skipped` without touching setup; everything else runs through
//! [`Suite::execute`] and is classified from what the body, its sub-cases and the hooks produced.

use std::time::Instant;

use tally_core::{MethodState, Outcome, TransitionError};

use crate::case::{Execution, Marker, Suite};
use crate::config::RunConfig;
use crate::context::TestContext;
use crate::fault::Fault;
use crate::registry::{Registry, Scope, Selected};
use crate::reporter::TestReporter;
use crate::result::{FailureKind, FailureRecord, MethodReport, RunResult};

/// Runs suites from a [`Registry`] under one [`RunConfig`].
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

/// Terminal classification of one method.
struct Verdict {
    outcome: Outcome,
    failures: Vec<FailureRecord>,
    expected: Vec<FailureRecord>,
    checks: usize,
    subcases: usize,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every selected method once, in registration then declaration order.
    ///
    /// ## Parameters
    /// - `registry`: the suites to draw from; `config.scopes` and `config.keyword` narrow it.
    /// - `reporter`: receives progress events.
    ///
    /// ## Returns
    /// - (`RunResult`): counts, per-method reports and the failure log.
    ///
    /// ## Notes
    /// - With `fail_fast`, the run stops after the first method that fails it.
    #[tracing::instrument(skip_all, fields(suites = registry.len()))]
    pub fn run(&self, registry: &Registry, reporter: &mut dyn TestReporter) -> RunResult {
        let start = Instant::now();
        let scopes: Vec<Scope> = self.config.scopes.iter().map(|s| Scope::parse(s)).collect();
        let selected = registry.select(&scopes, self.config.keyword.as_deref());
        reporter.on_collection_complete(selected.len());

        let mut result = RunResult::new();
        for item in &selected {
            let Some(suite) = registry.suites().get(item.suite) else {
                continue;
            };
            reporter.on_test_start(suite.name(), &item.info);

            let started = Instant::now();
            let (report, verdict) = match self.run_method(suite.as_ref(), item) {
                Ok(verdict) => (self.report(suite.as_ref(), item, &verdict, started), verdict),
                Err(err) => {
                    tracing::error!(%err, "method lifecycle violated");
                    let verdict = lifecycle_error(suite.name(), &item.info.name, &err);
                    (self.report(suite.as_ref(), item, &verdict, started), verdict)
                }
            };

            reporter.on_test_complete(&report, &verdict.failures);
            let stop = self.config.fail_fast && report.outcome.fails_run();
            result.record(report, verdict.failures, verdict.expected);
            if stop {
                tracing::info!("stopping after first failure");
                break;
            }
        }

        result.set_duration(start.elapsed());
        reporter.on_run_complete(&result);
        result
    }

    #[tracing::instrument(skip_all, fields(case = suite.name(), method = %item.info.name))]
    fn run_method(&self, suite: &dyn Suite, item: &Selected) -> Result<Verdict, TransitionError> {
        let state = MethodState::default();

        if let Marker::Skip(reason) = &item.info.marker {
            let state = state.skip()?;
            tracing::debug!(%state, reason = %reason, "skipped");
            return Ok(Verdict {
                outcome: Outcome::Skipped,
                failures: Vec::new(),
                expected: Vec::new(),
                checks: 0,
                subcases: 0,
            });
        }

        let state = state.start()?;
        let mut ctx = TestContext::from_config(&self.config);
        let execution = suite.execute(item.index, &mut ctx);
        let verdict = classify(suite.name(), &item.info.name, &item.info.marker, &ctx, execution);
        let state = state.finish(verdict.outcome)?;
        tracing::debug!(%state, checks = verdict.checks, "finished");
        Ok(verdict)
    }

    fn report(&self, suite: &dyn Suite, item: &Selected, verdict: &Verdict, started: Instant) -> MethodReport {
        let reason = match &item.info.marker {
            Marker::Skip(reason) | Marker::ExpectedFailure(reason) if !reason.is_empty() => Some(reason.clone()),
            _ => None,
        };
        MethodReport {
            case: suite.name().to_string(),
            method: item.info.name.clone(),
            outcome: verdict.outcome,
            duration: started.elapsed(),
            reason,
            checks: verdict.checks,
            subcases: verdict.subcases,
        }
    }
}

fn kind_of(fault: &Fault) -> FailureKind {
    if fault.is_assertion() {
        FailureKind::Assertion
    } else {
        FailureKind::Error
    }
}

/// Turn an [`Execution`] and the context it filled into an outcome plus failure records.
fn classify(case: &str, method: &str, marker: &Marker, ctx: &TestContext, execution: Execution) -> Verdict {
    let mut body_failures = Vec::new();
    let mut hook_failures = Vec::new();
    let mut body_errored = false;

    match execution {
        Execution::SetupFailed(fault) => {
            hook_failures.push(FailureRecord::from_fault(case, method, None, FailureKind::Setup, &fault));
        }
        Execution::Ran { body, teardown } => {
            body_failures.extend(
                ctx.failed_checks()
                    .filter_map(|check| FailureRecord::from_check(case, method, check)),
            );
            // Sub-case faults fail the method; they never make it errored.
            body_failures.extend(ctx.labeled_faults().iter().map(|lf| {
                FailureRecord::from_fault(case, method, Some(lf.label.clone()), kind_of(&lf.fault), &lf.fault)
            }));
            match body {
                Ok(()) => {}
                Err(Fault::Assertion(failure)) if ctx.has_recorded(&failure) => {}
                Err(fault) => {
                    body_errored = !fault.is_assertion();
                    body_failures.push(FailureRecord::from_fault(case, method, None, kind_of(&fault), &fault));
                }
            }
            if let Err(fault) = teardown {
                hook_failures.push(FailureRecord::from_fault(
                    case,
                    method,
                    None,
                    FailureKind::Teardown,
                    &fault,
                ));
            }
        }
    }

    let body_outcome = if body_errored {
        Outcome::Errored
    } else if body_failures.is_empty() {
        Outcome::Passed
    } else {
        Outcome::Failed
    };
    let expects_failure = matches!(marker, Marker::ExpectedFailure(_));
    let outcome = match (hook_failures.is_empty(), expects_failure, body_outcome) {
        (false, _, _) => Outcome::Errored,
        (true, true, Outcome::Passed) => Outcome::UnexpectedSuccess,
        (true, true, _) => Outcome::ExpectedFailure,
        (true, false, outcome) => outcome,
    };

    let (mut failures, expected) = if expects_failure && body_outcome != Outcome::Passed {
        (Vec::new(), body_failures)
    } else {
        (body_failures, Vec::new())
    };
    if outcome == Outcome::UnexpectedSuccess {
        failures.push(FailureRecord::unexpected_success(case, method));
    }
    failures.extend(hook_failures);

    Verdict {
        outcome,
        failures,
        expected,
        checks: ctx.checks().len(),
        subcases: ctx.subcases_run(),
    }
}

fn lifecycle_error(case: &str, method: &str, err: &TransitionError) -> Verdict {
    let fault = Fault::Raised(tally_core::TallyError::with_message(
        tally_core::ErrorKind::RuntimeError,
        err.to_string(),
    ));
    Verdict {
        outcome: Outcome::Errored,
        failures: vec![FailureRecord::from_fault(case, method, None, FailureKind::Error, &fault)],
        expected: Vec::new(),
        checks: 0,
        subcases: 0,
    }
}
