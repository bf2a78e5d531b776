//! Property-based tests for the sample collaborators and the assertion engine
//!
//! These use proptest to check invariants across many generated inputs.

use proptest::prelude::*;
use tally::samples::{add, divide};
use tally::{ErrorKind, TestContext, Tolerance};

proptest! {
    /// Property: add is commutative
    #[test]
    fn add_is_commutative(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(add(a, b), add(b, a));
    }

    /// Property: the assertion engine agrees, and records one passing check per call
    #[test]
    fn commutativity_check_passes(a in any::<i64>(), b in any::<i64>()) {
        let mut t = TestContext::new();
        prop_assert!(t.assert_eq(add(a, b), add(b, a), "").is_ok());
        prop_assert_eq!(t.checks().len(), 1);
        prop_assert!(!t.has_failures());
    }

    /// Property: dividing a product by one factor gives back the other, within tolerance
    #[test]
    fn divide_inverts_multiplication(a in -1.0e6f64..1.0e6, b in 1.0e-3f64..1.0e3) {
        let quotient = divide(a * b, b).unwrap();
        let mut t = TestContext::new().with_tolerance(Tolerance::Absolute(1e-6));
        t.assert_approx_eq(quotient, a, "").unwrap();
        prop_assert!(!t.has_failures(), "{} / {} gave {}", a * b, b, quotient);
    }

    /// Property: any finite dividend raises on a zero divisor
    #[test]
    fn divide_by_zero_always_raises(a in proptest::num::f64::NORMAL) {
        let mut t = TestContext::new();
        let raised = t.assert_raises(ErrorKind::ZeroDivisionError, || divide(a, 0.0)).unwrap();
        prop_assert!(raised.is_some());
    }
}

#[test]
fn divide_normal_within_default_tolerance() {
    let mut t = TestContext::new();
    t.assert_approx_eq(divide(10.0, 2.0).unwrap(), 5.0, "").unwrap();
    assert!(!t.has_failures());
}
