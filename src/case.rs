//! Test case containers.
//!
//! A [`TestCase`] groups related [`TestMethod`]s that share setup and teardown. Setup builds a
//! fresh fixture `F` for every method and teardown consumes it, so no mutable state survives from
//! one method to the next.
//!
//! ```rust
//! use tally::{Marker, Suite, TestCase};
//!
//! let case = TestCase::with_setup("TestMath", || Ok(vec![(1, 2, 3), (0, 0, 0)]))
//!     .test("test_add", |t, pairs| {
//!         for &(a, b, expected) in pairs.iter() {
//!             t.assert_eq(a + b, expected, "")?;
//!         }
//!         Ok(())
//!     })
//!     .skip("test_slow", "long running", |t, _| t.assert_true(true, ""));
//!
//! assert_eq!(case.name(), "TestMath");
//! assert_eq!(case.methods()[1].marker, Marker::Skip("long running".into()));
//! ```

use tally_core::{ErrorKind, TallyError};

use crate::capture;
use crate::context::TestContext;
use crate::fault::{Fault, MethodResult};

type SetupFn<F> = Box<dyn Fn() -> Result<F, Fault>>;
type TeardownFn<F> = Box<dyn Fn(F) -> MethodResult>;
type BodyFn<F> = Box<dyn Fn(&mut TestContext, &mut F) -> MethodResult>;

/// Control-flow annotation evaluated by the runner; never raised as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    /// Never invoke the body; report it skipped with this reason.
    Skip(String),
    /// The body is known to fail; a pass is reported as an unexpected success.
    ExpectedFailure(String),
}

/// Name and marker of one method, as listed before running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    pub marker: Marker,
}

/// What happened around one method body, before outcome classification.
#[derive(Debug)]
pub enum Execution {
    /// Setup faulted; neither the body nor teardown ran.
    SetupFailed(Fault),
    Ran {
        body: MethodResult,
        teardown: MethodResult,
    },
}

/// One independently reported check.
pub struct TestMethod<F> {
    pub name: String,
    pub marker: Marker,
    body: BodyFn<F>,
}

/// A named group of methods sharing setup and teardown.
pub struct TestCase<F> {
    name: String,
    description: Option<String>,
    setup: SetupFn<F>,
    teardown: Option<TeardownFn<F>>,
    methods: Vec<TestMethod<F>>,
}

impl TestCase<()> {
    /// A case without a fixture.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_setup(name, || Ok(()))
    }
}

impl<F: 'static> TestCase<F> {
    /// A case whose `setup` builds a fresh fixture before every method.
    pub fn with_setup(name: impl Into<String>, setup: impl Fn() -> Result<F, Fault> + 'static) -> Self {
        Self {
            name: name.into(),
            description: None,
            setup: Box::new(setup),
            teardown: None,
            methods: Vec::new(),
        }
    }

    /// Run `teardown` after every method whose setup succeeded, even when the body faulted.
    pub fn teardown(mut self, teardown: impl Fn(F) -> MethodResult + 'static) -> Self {
        self.teardown = Some(Box::new(teardown));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn test(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut TestContext, &mut F) -> MethodResult + 'static,
    ) -> Self {
        self.method(name, Marker::None, body)
    }

    pub fn skip(
        self,
        name: impl Into<String>,
        reason: impl Into<String>,
        body: impl Fn(&mut TestContext, &mut F) -> MethodResult + 'static,
    ) -> Self {
        self.method(name, Marker::Skip(reason.into()), body)
    }

    pub fn expected_failure(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut TestContext, &mut F) -> MethodResult + 'static,
    ) -> Self {
        self.method(name, Marker::ExpectedFailure(String::new()), body)
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        marker: Marker,
        body: impl Fn(&mut TestContext, &mut F) -> MethodResult + 'static,
    ) -> Self {
        self.methods.push(TestMethod {
            name: name.into(),
            marker,
            body: Box::new(body),
        });
        self
    }
}

/// Object-safe view of a test case, so cases with different fixtures share one registry.
pub trait Suite {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Methods in declaration order.
    fn methods(&self) -> Vec<MethodInfo>;

    /// Run setup, the method body and teardown for the method at `index`.
    ///
    /// Every hook runs inside the panic boundary. Scoped patches are restored after the body and
    /// before teardown.
    fn execute(&self, index: usize, ctx: &mut TestContext) -> Execution;
}

impl<F: 'static> Suite for TestCase<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn methods(&self) -> Vec<MethodInfo> {
        self.methods
            .iter()
            .map(|m| MethodInfo {
                name: m.name.clone(),
                marker: m.marker.clone(),
            })
            .collect()
    }

    #[tracing::instrument(skip_all, fields(case = %self.name, index = index))]
    fn execute(&self, index: usize, ctx: &mut TestContext) -> Execution {
        let Some(method) = self.methods.get(index) else {
            return Execution::SetupFailed(Fault::Raised(TallyError::with_message(
                ErrorKind::IndexError,
                format!("'{}' has no method at index {index}", self.name),
            )));
        };

        let mut fixture = match capture::catch(|| (self.setup)()).and_then(|r| r) {
            Ok(fixture) => fixture,
            Err(fault) => {
                tracing::debug!(method = %method.name, fault = %fault, "setup failed");
                return Execution::SetupFailed(fault);
            }
        };

        let body = capture::catch_fault(|| (method.body)(&mut *ctx, &mut fixture));
        ctx.restore_patches();

        let teardown = match &self.teardown {
            Some(teardown) => capture::catch_fault(|| teardown(fixture)),
            None => Ok(()),
        };

        Execution::Ran { body, teardown }
    }
}
