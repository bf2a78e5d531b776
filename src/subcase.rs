//! Sub-case runner.
//!
//! [`TestContext::subcase`] runs one labeled variant of a test body behind its own failure
//! boundary: assertions inside carry the label, and an `Err` or panic escaping the body is pinned
//! to that label instead of ending the enclosing method. The caller simply moves on to the next
//! variant.
//!
//! ```rust
//! use tally::{label, MethodResult, TestContext};
//!
//! fn body(t: &mut TestContext) -> MethodResult {
//!     for (a, b, expected) in [(2, 3, 5), (10, -10, 0), (0, 0, 0)] {
//!         t.subcase(label!(a = a, b = b), |t| t.assert_eq(a + b, expected, ""));
//!     }
//!     Ok(())
//! }
//!
//! let mut t = TestContext::new();
//! body(&mut t).unwrap();
//! assert_eq!(t.subcases_run(), 3);
//! assert!(!t.has_failures());
//! ```

use tally_core::Label;

use crate::capture;
use crate::context::{LabeledFault, TestContext};
use crate::fault::MethodResult;

impl TestContext {
    /// Run `body` under `label`, isolating its failures from sibling sub-cases.
    ///
    /// Nested sub-cases merge labels, outer pairs first.
    ///
    /// ## Returns
    /// - (`bool`): whether this sub-case passed (no failed check, no escaped fault).
    pub fn subcase(&mut self, label: Label, body: impl FnOnce(&mut TestContext) -> MethodResult) -> bool {
        let label = match &self.current_label {
            Some(outer) => outer.merged(&label),
            None => label,
        };
        let outer = self.current_label.replace(label.clone());
        let failed_checks_before = self.failed_checks().count();
        self.subcases_run += 1;

        let result = capture::catch_fault(|| body(&mut *self));

        let mut passed = self.failed_checks().count() == failed_checks_before;
        match result {
            Ok(()) => {}
            // Already in the check log (stop-on-first-failure mode).
            Err(crate::fault::Fault::Assertion(failure)) if self.has_recorded(&failure) => {
                passed = false;
            }
            Err(fault) => {
                tracing::debug!(label = %label, fault = %fault, "sub-case faulted");
                passed = false;
                self.labeled_faults.push(LabeledFault {
                    label: label.clone(),
                    fault,
                });
            }
        }

        self.current_label = outer;
        passed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fault::Fault;
    use tally_core::{ErrorKind, TallyError, label};

    #[test]
    fn test_only_the_bad_label_fails() {
        let mut t = TestContext::new();
        let cases = [(2, 3, 5), (10, -10, 1), (0, 0, 0)];
        let passed: Vec<bool> = cases
            .iter()
            .map(|&(a, b, expected)| t.subcase(label!(a = a, b = b), |t| t.assert_eq(a + b, expected, "")))
            .collect();

        assert_eq!(passed, vec![true, false, true]);
        let failed: Vec<_> = t.failed_checks().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].label.as_ref().unwrap().to_string(), "(a=10, b=-10)");
    }

    #[test]
    fn test_panic_is_pinned_to_label_and_siblings_run() {
        let mut t = TestContext::new();
        t.subcase(label!(n = 1), |_| panic!("first variant exploded"));
        let second = t.subcase(label!(n = 2), |t| t.assert_true(true, ""));

        assert!(second);
        assert_eq!(t.labeled_faults().len(), 1);
        let fault = &t.labeled_faults()[0];
        assert_eq!(fault.label.to_string(), "(n=1)");
        assert!(matches!(&fault.fault, Fault::Panicked { message, .. } if message == "first variant exploded"));
    }

    #[test]
    fn test_raised_error_is_pinned_to_label() {
        let mut t = TestContext::new();
        t.subcase(label!(key = "missing"), |_| {
            Err(TallyError::with_message(ErrorKind::KeyError, "'missing'").into())
        });
        assert!(t.has_failures());
        assert!(matches!(t.labeled_faults()[0].fault, Fault::Raised(_)));
    }

    #[test]
    fn test_stop_mode_failure_is_not_double_counted() {
        let mut t = TestContext::new().with_stop_on_first_failure(true);
        let passed = t.subcase(label!(a = 1), |t| {
            t.assert_eq(1, 2, "")?;
            t.assert_eq(3, 3, "")
        });
        assert!(!passed);
        assert_eq!(t.checks().len(), 1);
        assert!(t.labeled_faults().is_empty());
    }

    #[test]
    fn test_nested_labels_merge_and_restore() {
        let mut t = TestContext::new();
        t.subcase(label!(group = "outer"), |t| {
            t.subcase(label!(x = 1), |t| t.assert_eq(1, 0, ""));
            t.assert_eq(t.current_label().map(ToString::to_string), Some("(group=outer)".to_string()), "")
        });
        assert!(t.current_label().is_none());
        let failed: Vec<_> = t.failed_checks().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].label.as_ref().unwrap().to_string(), "(group=outer, x=1)");
    }
}
