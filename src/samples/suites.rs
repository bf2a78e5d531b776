//! The sample test groups.
//!
//! Each function builds one [`TestCase`]; [`registry`] registers them in the order the `tally`
//! binary runs them.

use std::rc::Rc;

use tally_core::{ErrorKind, label};

use super::console::{self, PrintFn};
use super::greeter::{GreetFn, Greeter, StaticName, StubNameProvider};
use super::math::{add, divide};
use crate::case::TestCase;
use crate::registry::Registry;
use crate::substitute::Capability;

/// Every sample group, in run order.
pub fn registry() -> Registry {
    Registry::new()
        .with(math_functions())
        .with(greeter_with_mock())
        .with(integration_style())
        .with(parameterization())
        .with(side_effects())
        .with(patch_isolation())
}

pub fn math_functions() -> TestCase<Vec<(i64, i64, i64)>> {
    TestCase::with_setup("TestMathFunctions", || Ok(vec![(1, 2, 3), (0, 0, 0), (-1, 1, 0)]))
        .describe("Tests for simple math functions.")
        .teardown(|pairs| {
            tracing::trace!(pairs = pairs.len(), "released fixture");
            Ok(())
        })
        .test("test_add_basic", |t, pairs| {
            for &(a, b, expected) in pairs.iter() {
                t.subcase(label!(a = a, b = b), |t| {
                    t.assert_eq(add(a, b), expected, &format!("add({a}, {b}) should be {expected}"))
                });
            }
            Ok(())
        })
        .test("test_divide_normal", |t, _| {
            let quotient = divide(10.0, 2.0)?;
            t.assert_approx_eq(quotient, 5.0, "")
        })
        .test("test_divide_by_zero_raises", |t, _| {
            t.assert_raises(ErrorKind::ZeroDivisionError, || divide(1.0, 0.0))?;
            Ok(())
        })
        .test("test_add_property", |t, _| {
            let (a, b) = (7, 3);
            t.assert_eq(add(a, b), add(b, a), "add is commutative")
        })
}

pub fn greeter_with_mock() -> TestCase<()> {
    TestCase::new("TestGreeterWithMock")
        .describe("Greeter with a substituted name provider.")
        .test("test_greet_calls_name_provider", |t, _| {
            let provider = Rc::new(StubNameProvider::returning("Aharon"));
            let greeter = Greeter::new(Rc::clone(&provider));

            t.assert_eq(greeter.greet(), "Hello, Aharon!".to_string(), "")?;
            t.assert_called_once(&provider.get_name)
        })
        .test("test_greet_patch_example", |t, _| {
            let patched: GreetFn = Rc::new(|_: &Greeter| "patched!".to_string());
            t.patch(&Greeter::greet_method(), patched);

            let greeter = Greeter::new(StubNameProvider::default());
            t.assert_eq(greeter.greet(), "patched!".to_string(), "")
        })
}

pub fn integration_style() -> TestCase<()> {
    TestCase::new("TestIntegrationStyle")
        .describe("A small integration-style group.")
        .skip(
            "test_integration_heavy",
            "Skipping integration test in unit test run - long running",
            |t, _| t.assert_true(true, ""),
        )
        .expected_failure("test_expected_failure_example", |t, _| t.assert_eq(1 + 1, 3, ""))
}

pub fn parameterization() -> TestCase<()> {
    TestCase::new("TestParameterization").test("test_multiple_inputs", |t, _| {
        for ((a, b), expected) in [((2, 3), 5), ((10, -10), 0), ((0, 0), 0)] {
            t.subcase(label!(a = a, b = b), |t| t.assert_eq(add(a, b), expected, ""));
        }
        Ok(())
    })
}

pub fn side_effects() -> TestCase<()> {
    TestCase::new("TestSideEffects").test("test_print_was_called", |t, _| {
        let print = Rc::new(Capability::<String, ()>::new("print"));
        let recorder = Rc::clone(&print);
        let fake: PrintFn = Rc::new(move |line: &str| recorder.invoke(line.to_string()));
        t.patch(&console::printer(), fake);

        console::print("hello");
        t.assert_called_with(&*print, "hello".to_string())
    })
}

/// A patch made by one method is gone before the next one starts.
pub fn patch_isolation() -> TestCase<Greeter> {
    TestCase::with_setup("TestPatchIsolation", || Ok(Greeter::new(StaticName("Ada".into()))))
        .test("test_patch_salutation", |t, greeter| {
            t.patch(greeter.salutation(), "Howdy".to_string());
            t.patch(&Greeter::greet_method(), Rc::new(|_: &Greeter| "patched!".to_string()) as GreetFn);
            t.assert_eq(greeter.greet(), "patched!".to_string(), "")
        })
        .test("test_originals_restored", |t, greeter| {
            t.assert_false(Greeter::greet_method().is_patched(), "")?;
            t.assert_eq(greeter.greet(), "Hello, Ada!".to_string(), "")
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::case::Suite;

    #[test]
    fn test_registry_order() {
        let registry = registry();
        let names: Vec<_> = registry.suites().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "TestMathFunctions",
                "TestGreeterWithMock",
                "TestIntegrationStyle",
                "TestParameterization",
                "TestSideEffects",
                "TestPatchIsolation",
            ]
        );
    }

    #[test]
    fn test_math_functions_lists_methods() {
        let case = math_functions();
        let methods: Vec<_> = case.methods().into_iter().map(|m| m.name).collect();
        assert_eq!(
            methods,
            vec![
                "test_add_basic",
                "test_divide_normal",
                "test_divide_by_zero_raises",
                "test_add_property"
            ]
        );
        assert_eq!(case.description(), Some("Tests for simple math functions."));
    }
}
