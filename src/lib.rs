#![forbid(unsafe_code)]
//! tally: a minimal unittest-style test-case runner.
//!
//! Test cases group methods that share setup and teardown. Assertions are soft by default, so every
//! failed check in a method is reported. Sub-cases isolate labeled variants of one body, and
//! collaborators can be replaced with call-recording capabilities or patched values that are
//! always restored. The runner reports one outcome per method and turns the run into an exit code.
//!
//! ```rust
//! use tally::{Registry, RunConfig, Runner, TestCase, label, reporter::SilentReporter};
//!
//! let registry = Registry::new().with(
//!     TestCase::with_setup("TestAdd", || Ok(vec![(2, 3, 5), (10, -10, 0)])).test("test_pairs", |t, pairs| {
//!         for &(a, b, expected) in pairs.iter() {
//!             t.subcase(label!(a = a, b = b), |t| t.assert_eq(a + b, expected, ""));
//!         }
//!         Ok(())
//!     }),
//! );
//!
//! let result = Runner::new(RunConfig::default()).run(&registry, &mut SilentReporter);
//! assert!(result.was_successful());
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test bodies**: panics are contained per method (or per sub-case) and reported as faults.

pub mod assertions;
pub mod capture;
pub mod case;
pub mod cli;
pub mod config;
pub mod context;
pub mod fault;
pub mod registry;
pub mod reporter;
pub mod result;
pub mod runner;
pub mod samples;
pub mod subcase;
pub mod substitute;
pub mod version;

pub use case::{Execution, Marker, MethodInfo, Suite, TestCase, TestMethod};
pub use config::{OutputFormat, RunConfig, Verbosity};
pub use context::{Check, LabeledFault, TestContext};
pub use fault::{AssertionFailure, Fault, MethodResult};
pub use registry::{Registry, Scope};
pub use reporter::{ConsoleReporter, JsonReporter, TestReporter};
pub use result::{FailureKind, FailureRecord, MethodReport, RunResult};
pub use runner::Runner;
pub use substitute::{Capability, Patch, Patchable, Recorded};

pub use tally_core::{ErrorKind, Label, MethodState, Outcome, TallyError, Tolerance, label};
