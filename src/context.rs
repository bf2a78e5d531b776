//! Per-method execution context.
//!
//! A fresh [`TestContext`] is created for every test method. Test bodies receive it as `&mut` and
//! use it for assertions ([`crate::assertions`]), sub-cases ([`crate::subcase`]) and scoped patches.
//! It accumulates one [`Check`] per assertion plus any faults that sub-cases isolated.

use std::any::Any;
use std::panic::Location;

use tally_core::{Label, Tolerance};

use crate::config::RunConfig;
use crate::fault::{AssertionFailure, Fault, MethodResult};
use crate::substitute::Patchable;

/// The record of one assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    /// Sub-case label active when the assertion ran.
    pub label: Option<Label>,
    pub failure: Option<AssertionFailure>,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// A non-assertion fault that a sub-case contained.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFault {
    pub label: Label,
    pub fault: Fault,
}

/// State owned by one running test method.
pub struct TestContext {
    pub(crate) stop_on_first_failure: bool,
    pub(crate) tolerance: Tolerance,
    pub(crate) checks: Vec<Check>,
    pub(crate) current_label: Option<Label>,
    pub(crate) labeled_faults: Vec<LabeledFault>,
    pub(crate) subcases_run: usize,
    patches: Vec<Box<dyn Any>>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context with soft assertions and the default tolerance.
    pub fn new() -> Self {
        Self {
            stop_on_first_failure: false,
            tolerance: Tolerance::default(),
            checks: Vec::new(),
            current_label: None,
            labeled_faults: Vec::new(),
            subcases_run: 0,
            patches: Vec::new(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new()
            .with_stop_on_first_failure(config.stop_on_first_failure)
            .with_tolerance(config.tolerance)
    }

    /// Make failed assertions return `Err` so `?` aborts the body.
    pub fn with_stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn labeled_faults(&self) -> &[LabeledFault] {
        &self.labeled_faults
    }

    /// Label of the innermost active sub-case.
    pub fn current_label(&self) -> Option<&Label> {
        self.current_label.as_ref()
    }

    pub fn subcases_run(&self) -> usize {
        self.subcases_run
    }

    /// Check whether any assertion failed or any sub-case faulted so far.
    pub fn has_failures(&self) -> bool {
        !self.labeled_faults.is_empty() || self.checks.iter().any(|c| !c.passed())
    }

    /// Failed assertions, in the order they ran.
    pub fn failed_checks(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed())
    }

    /// Check whether `failure` is already in the check log.
    pub(crate) fn has_recorded(&self, failure: &AssertionFailure) -> bool {
        self.checks
            .iter()
            .any(|c| c.failure.as_ref() == Some(failure))
    }

    /// Append a check. A failure is returned as `Err` only in stop-on-first-failure mode.
    ///
    /// The failure is stamped with the location of the assertion call.
    #[track_caller]
    pub(crate) fn record(&mut self, failure: Option<AssertionFailure>) -> MethodResult {
        let location = Location::caller();
        let label = self.current_label.clone();
        match failure.map(|f| f.at(location)) {
            None => {
                self.checks.push(Check {
                    label,
                    failure: None,
                });
                Ok(())
            }
            Some(failure) => {
                tracing::debug!(label = ?label, message = %failure.message, "assertion failed");
                self.checks.push(Check {
                    label,
                    failure: Some(failure.clone()),
                });
                if self.stop_on_first_failure {
                    Err(Fault::Assertion(failure))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Replace the value in `target` until the current test method finishes.
    ///
    /// The original value is restored right after the body returns, before teardown, whether the
    /// body passed, failed or panicked. Patches are undone in reverse order.
    pub fn patch<T: 'static>(&mut self, target: &Patchable<T>, value: T) {
        self.patches.push(Box::new(target.patch(value)));
    }

    /// Undo every scoped patch, newest first.
    pub(crate) fn restore_patches(&mut self) {
        while let Some(patch) = self.patches.pop() {
            drop(patch);
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.restore_patches();
    }
}
