//! Assertion engine.
//!
//! Every check is a [`TestContext`] method. Each call appends exactly one [`crate::context::Check`],
//! passed or failed, and remembers the caller's location. In the default (soft) mode a failed check
//! returns `Ok(())` and the body keeps running; with `stop_on_first_failure` it returns
//! `Err(Fault::Assertion)` so `?` ends the body. Either way the method is reported `failed`.
//!
//! ```rust
//! use tally::{MethodResult, TestContext};
//!
//! fn body(t: &mut TestContext) -> MethodResult {
//!     t.assert_eq(2 + 3, 5, "add")?;
//!     t.assert_approx_eq(10.0 / 4.0, 2.5, "")?;
//!     Ok(())
//! }
//!
//! let mut t = TestContext::new();
//! assert!(body(&mut t).is_ok());
//! assert_eq!(t.checks().len(), 2);
//! ```

use std::fmt::Debug;

use tally_core::{ErrorKind, TallyError, Tolerance};

use crate::capture;
use crate::context::TestContext;
use crate::fault::{AssertionFailure, Fault, MethodResult};
use crate::substitute::Recorded;

impl TestContext {
    /// Assert `actual == expected`.
    #[track_caller]
    pub fn assert_eq<T: PartialEq + Debug>(&mut self, actual: T, expected: T, msg: &str) -> MethodResult {
        let failure = (actual != expected).then(|| {
            AssertionFailure::new(format!("{actual:?} != {expected:?}"))
                .with_values(format!("{expected:?}"), format!("{actual:?}"))
                .with_note(msg)
        });
        self.record(failure)
    }

    /// Assert `actual != unexpected`.
    #[track_caller]
    pub fn assert_ne<T: PartialEq + Debug>(&mut self, actual: T, unexpected: T, msg: &str) -> MethodResult {
        let failure = (actual == unexpected)
            .then(|| AssertionFailure::new(format!("{actual:?} == {unexpected:?}")).with_note(msg));
        self.record(failure)
    }

    /// Assert `actual` is approximately `expected` under the context's tolerance.
    #[track_caller]
    pub fn assert_approx_eq(&mut self, actual: f64, expected: f64, msg: &str) -> MethodResult {
        let tolerance = self.tolerance;
        self.assert_approx_eq_with(actual, expected, tolerance, msg)
    }

    /// Assert `actual` is approximately `expected` under an explicit tolerance.
    #[track_caller]
    pub fn assert_approx_eq_with(
        &mut self,
        actual: f64,
        expected: f64,
        tolerance: Tolerance,
        msg: &str,
    ) -> MethodResult {
        let failure = (!tolerance.admits(actual, expected)).then(|| {
            AssertionFailure::new(format!(
                "{actual:?} != {expected:?} {}",
                tolerance.describe()
            ))
            .with_values(format!("{expected:?}"), format!("{actual:?}"))
            .with_note(msg)
        });
        self.record(failure)
    }

    #[track_caller]
    pub fn assert_true(&mut self, condition: bool, msg: &str) -> MethodResult {
        let failure = (!condition).then(|| AssertionFailure::new("false is not true").with_note(msg));
        self.record(failure)
    }

    #[track_caller]
    pub fn assert_false(&mut self, condition: bool, msg: &str) -> MethodResult {
        let failure = condition.then(|| AssertionFailure::new("true is not false").with_note(msg));
        self.record(failure)
    }

    /// Assert that `block` raises a fault of `kind`.
    ///
    /// On success the raised error is returned so the caller can inspect its message. When the
    /// check fails in soft mode, `Ok(None)` is returned.
    #[track_caller]
    pub fn assert_raises<T: Debug>(
        &mut self,
        kind: ErrorKind,
        block: impl FnOnce() -> Result<T, TallyError>,
    ) -> Result<Option<TallyError>, Fault> {
        match block() {
            Err(err) if err.is(kind) => {
                self.record(None)?;
                Ok(Some(err))
            }
            Err(err) => {
                let failure = AssertionFailure::new(format!("expected {kind}, but {} was raised", err.kind))
                    .with_values(kind.as_str(), err.to_string());
                self.record(Some(failure))?;
                Ok(None)
            }
            Ok(value) => {
                let failure = AssertionFailure::new(format!("{kind} not raised"))
                    .with_values(kind.as_str(), format!("Ok({value:?})"));
                self.record(Some(failure))?;
                Ok(None)
            }
        }
    }

    /// Assert that `block` completes without raising, handing its value back.
    #[track_caller]
    pub fn assert_no_fault<T>(&mut self, block: impl FnOnce() -> Result<T, TallyError>) -> Result<Option<T>, Fault> {
        match block() {
            Ok(value) => {
                self.record(None)?;
                Ok(Some(value))
            }
            Err(err) => {
                let failure = AssertionFailure::new(format!("unexpected fault: {err}"));
                self.record(Some(failure))?;
                Ok(None)
            }
        }
    }

    /// Assert that `block` panics. The panic is contained and never reaches the runner.
    #[track_caller]
    pub fn assert_panics<R>(&mut self, block: impl FnOnce() -> R) -> MethodResult {
        let failure = capture::catch(block)
            .is_ok()
            .then(|| AssertionFailure::new("block did not panic"));
        self.record(failure)
    }

    /// Fail the current test unconditionally. Always returns `Err`, whatever the mode.
    #[track_caller]
    pub fn fail(&mut self, msg: &str) -> MethodResult {
        let failure = AssertionFailure::new(msg);
        self.record(Some(failure.clone()))?;
        Err(Fault::Assertion(failure))
    }

    /// Assert the capability was invoked at least once.
    #[track_caller]
    pub fn assert_called<C: Recorded + ?Sized>(&mut self, capability: &C) -> MethodResult {
        let failure = (capability.call_count() == 0)
            .then(|| AssertionFailure::new(format!("expected '{}' to have been called", capability.name())));
        self.record(failure)
    }

    #[track_caller]
    pub fn assert_not_called<C: Recorded + ?Sized>(&mut self, capability: &C) -> MethodResult {
        let count = capability.call_count();
        let failure = (count != 0).then(|| {
            AssertionFailure::new(format!(
                "expected '{}' to not have been called. Called {count} times",
                capability.name()
            ))
        });
        self.record(failure)
    }

    /// Assert the capability was invoked exactly once.
    #[track_caller]
    pub fn assert_called_once<C: Recorded + ?Sized>(&mut self, capability: &C) -> MethodResult {
        let count = capability.call_count();
        let failure = (count != 1).then(|| {
            AssertionFailure::new(format!(
                "expected '{}' to have been called once. Called {count} times",
                capability.name()
            ))
            .with_values("1", count.to_string())
        });
        self.record(failure)
    }

    /// Assert the most recent invocation received `args`.
    #[track_caller]
    pub fn assert_called_with<C: Recorded + ?Sized>(&mut self, capability: &C, args: C::Args) -> MethodResult {
        let failure = match capability.last_call() {
            Some(last) if last == args => None,
            Some(last) => Some(
                AssertionFailure::new(format!("'{}' called with unexpected arguments", capability.name()))
                    .with_values(format!("{args:?}"), format!("{last:?}")),
            ),
            None => Some(
                AssertionFailure::new(format!("expected '{}' to be called with {args:?}", capability.name()))
                    .with_values(format!("{args:?}"), "not called"),
            ),
        };
        self.record(failure)
    }

    /// Assert the capability was invoked exactly once, with `args`.
    #[track_caller]
    pub fn assert_called_once_with<C: Recorded + ?Sized>(&mut self, capability: &C, args: C::Args) -> MethodResult {
        let failure = (!capability.was_called_once_with(&args)).then(|| {
            AssertionFailure::new(format!(
                "expected '{}' to be called once with {args:?}",
                capability.name()
            ))
            .with_values(format!("[{args:?}]"), format!("{:?}", capability.calls()))
        });
        self.record(failure)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::substitute::Capability;

    fn divide(a: f64, b: f64) -> Result<f64, TallyError> {
        if b == 0.0 {
            return Err(TallyError::zero_division());
        }
        Ok(a / b)
    }

    #[test]
    fn test_every_call_appends_one_check() {
        let mut t = TestContext::new();
        t.assert_eq(1, 1, "").unwrap();
        t.assert_eq(1, 2, "").unwrap();
        t.assert_true(false, "").unwrap();
        t.assert_false(false, "").unwrap();
        assert_eq!(t.checks().len(), 4);
        assert_eq!(t.failed_checks().count(), 2);
    }

    #[test]
    fn test_eq_failure_is_diff_friendly() {
        let mut t = TestContext::new();
        t.assert_eq(5, 6, "add(2, 3) should be 6").unwrap();
        let failure = t.checks()[0].failure.clone().unwrap();
        assert_eq!(failure.message, "5 != 6");
        assert_eq!(failure.expected.as_deref(), Some("6"));
        assert_eq!(failure.actual.as_deref(), Some("5"));
        assert_eq!(failure.note.as_deref(), Some("add(2, 3) should be 6"));
        assert_eq!(failure.location.file(), file!());
    }

    #[test]
    fn test_stop_on_first_failure_propagates() {
        let mut t = TestContext::new().with_stop_on_first_failure(true);
        assert!(t.assert_ne(3, 3, "").is_err());
    }

    #[test]
    fn test_approx_eq_uses_tolerance() {
        let mut t = TestContext::new();
        t.assert_approx_eq(divide(10.0, 2.0).unwrap(), 5.0, "").unwrap();
        t.assert_approx_eq(0.1 + 0.2, 0.3, "").unwrap();
        t.assert_approx_eq(1.0, 1.1, "").unwrap();
        assert_eq!(t.failed_checks().count(), 1);
        t.assert_approx_eq_with(1.0, 1.1, Tolerance::Absolute(0.5), "").unwrap();
        assert_eq!(t.failed_checks().count(), 1);
    }

    #[test]
    fn test_raises_matches_kind() {
        let mut t = TestContext::new();
        let raised = t
            .assert_raises(ErrorKind::ZeroDivisionError, || divide(1.0, 0.0))
            .unwrap();
        assert_eq!(raised.unwrap().message, "division by zero");
        assert!(!t.has_failures());
    }

    #[test]
    fn test_raises_fails_when_nothing_raised() {
        let mut t = TestContext::new();
        let raised = t
            .assert_raises(ErrorKind::ZeroDivisionError, || divide(1.0, 2.0))
            .unwrap();
        assert!(raised.is_none());
        let failure = t.failed_checks().next().unwrap().failure.clone().unwrap();
        assert_eq!(failure.message, "ZeroDivisionError not raised");
    }

    #[test]
    fn test_raises_fails_on_wrong_kind() {
        let mut t = TestContext::new();
        t.assert_raises(ErrorKind::KeyError, || divide(1.0, 0.0)).unwrap();
        let failure = t.failed_checks().next().unwrap().failure.clone().unwrap();
        assert_eq!(
            failure.message,
            "expected KeyError, but ZeroDivisionError was raised"
        );
    }

    #[test]
    fn test_no_fault_hands_value_back() {
        let mut t = TestContext::new();
        assert_eq!(t.assert_no_fault(|| divide(9.0, 3.0)).unwrap(), Some(3.0));
        assert_eq!(t.assert_no_fault(|| divide(9.0, 0.0)).unwrap(), None);
        assert_eq!(t.failed_checks().count(), 1);
    }

    #[test]
    fn test_panics_is_contained() {
        let mut t = TestContext::new();
        t.assert_panics(|| panic!("expected")).unwrap();
        t.assert_panics(|| 1).unwrap();
        assert_eq!(t.failed_checks().count(), 1);
    }

    #[test]
    fn test_fail_always_errs() {
        let mut t = TestContext::new();
        let err = t.fail("not implemented").unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(t.failed_checks().count(), 1);
    }

    #[test]
    fn test_call_assertions() {
        let get_name = Capability::<(), String>::new("get_name").returning("Aharon".into());
        let mut t = TestContext::new();
        t.assert_not_called(&get_name).unwrap();
        get_name.invoke(());
        t.assert_called(&get_name).unwrap();
        t.assert_called_once(&get_name).unwrap();
        t.assert_called_with(&get_name, ()).unwrap();
        t.assert_called_once_with(&get_name, ()).unwrap();
        assert!(!t.has_failures());

        get_name.invoke(());
        t.assert_called_once(&get_name).unwrap();
        let failure = t.failed_checks().next().unwrap().failure.clone().unwrap();
        assert_eq!(
            failure.message,
            "expected 'get_name' to have been called once. Called 2 times"
        );
    }

    #[test]
    fn test_called_with_reports_last_args() {
        let print = Capability::<String, ()>::new("print");
        print.invoke("hello".to_string());
        let mut t = TestContext::new();
        t.assert_called_with(&print, "hello".to_string()).unwrap();
        t.assert_called_with(&print, "bye".to_string()).unwrap();
        let failure = t.failed_checks().next().unwrap().failure.clone().unwrap();
        assert_eq!(failure.expected.as_deref(), Some("\"bye\""));
        assert_eq!(failure.actual.as_deref(), Some("\"hello\""));
    }
}
