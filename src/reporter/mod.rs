//! Run reporting.
//!
//! The runner talks to a [`TestReporter`] while it executes, so output formats stay separate from
//! execution. Two implementations ship: [`ConsoleReporter`] (unittest-style text) and
//! [`JsonReporter`].

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::case::MethodInfo;
use crate::result::{FailureRecord, MethodReport, RunResult};

/// Receives progress events from the runner.
pub trait TestReporter {
    /// Called once, after selection, with the number of methods about to run.
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called before a method's setup runs.
    fn on_test_start(&mut self, _case: &str, _method: &MethodInfo) {}

    /// Called when a method reached its terminal state, with the failures it logged.
    fn on_test_complete(&mut self, report: &MethodReport, failures: &[FailureRecord]);

    /// Called when all selected methods have finished.
    fn on_run_complete(&mut self, result: &RunResult);
}

/// Reporter that prints nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl TestReporter for SilentReporter {
    fn on_collection_complete(&mut self, _test_count: usize) {}

    fn on_test_complete(&mut self, _report: &MethodReport, _failures: &[FailureRecord]) {}

    fn on_run_complete(&mut self, _result: &RunResult) {}
}
