//! unittest-style console output.
//!
//! ```text
//! ..Fsx
//! ======================================================================
//! FAIL: test_add_basic (TestMathFunctions) (a=10, b=-10)
//! ----------------------------------------------------------------------
//! [tally::assertion_failure] at src/samples/suites.rs:40:17
//! 0 != 1
//!   expected: 1
//!   actual:   0
//!
//! ----------------------------------------------------------------------
//! Ran 5 tests in 0.002s
//!
//! FAILED (failures=1, skipped=1, expected failures=1)
//! ```

use std::io::{self, Write};

use tally_core::Outcome;

use super::TestReporter;
use crate::case::MethodInfo;
use crate::config::Verbosity;
use crate::result::{FailureRecord, MethodReport, RunResult};

const HEAVY_RULE: &str = "======================================================================";
const LIGHT_RULE: &str = "----------------------------------------------------------------------";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Human-readable reporter writing to any [`Write`] sink.
///
/// Write errors do not interrupt the run; the first one is kept and returned by
/// [`ConsoleReporter::into_inner`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbosity: Verbosity,
    color: bool,
    show_timing: bool,
    collected: usize,
    error: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::new(io::stdout(), verbosity)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self {
            out,
            verbosity,
            color: true,
            show_timing: true,
            collected: 0,
            error: None,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Leave elapsed times out of the summary.
    pub fn with_timing(mut self, show_timing: bool) -> Self {
        self.show_timing = show_timing;
        self
    }

    /// Hand back the sink, or the first write error.
    pub fn into_inner(mut self) -> io::Result<W> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn outcome_color(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Passed => GREEN,
            Outcome::Failed | Outcome::Errored | Outcome::UnexpectedSuccess => RED,
            Outcome::Skipped | Outcome::ExpectedFailure => YELLOW,
        }
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            self.error = Some(err);
        }
    }

    fn flush(&mut self) {
        if self.error.is_none() {
            if let Err(err) = self.out.flush() {
                self.error = Some(err);
            }
        }
    }

    fn failure_block(&self, failure: &FailureRecord) -> String {
        let mut block = String::new();
        let heading = self.paint(RED, failure.kind.heading());
        block.push_str(HEAVY_RULE);
        block.push('\n');
        block.push_str(&format!("{heading}: {} ({})", failure.method, failure.case));
        if let Some(label) = &failure.label {
            block.push_str(&format!(" {label}"));
        }
        block.push('\n');
        block.push_str(LIGHT_RULE);
        block.push('\n');

        let origin = match (&failure.code, &failure.location) {
            (Some(code), Some(location)) => Some(format!("[{code}] at {location}")),
            (Some(code), None) => Some(format!("[{code}]")),
            (None, Some(location)) => Some(format!("at {location}")),
            (None, None) => None,
        };
        if let Some(origin) = origin {
            block.push_str(&origin);
            block.push('\n');
        }
        block.push_str(&failure.message);
        block.push('\n');
        if let Some(expected) = &failure.expected {
            block.push_str(&format!("  expected: {expected}\n"));
        }
        if let Some(actual) = &failure.actual {
            block.push_str(&format!("  actual:   {actual}\n"));
        }
        if let Some(note) = &failure.note {
            block.push_str(&format!("  note:     {note}\n"));
        }
        block.push('\n');
        block
    }

    fn summary_line(&self, result: &RunResult) -> String {
        let details: Vec<String> = [
            (Outcome::Failed, "failures"),
            (Outcome::Errored, "errors"),
            (Outcome::Skipped, "skipped"),
            (Outcome::ExpectedFailure, "expected failures"),
            (Outcome::UnexpectedSuccess, "unexpected successes"),
        ]
        .iter()
        .filter(|(outcome, _)| result.count(*outcome) > 0)
        .map(|(outcome, name)| format!("{name}={}", result.count(*outcome)))
        .collect();

        let (color, verdict) = if result.was_successful() {
            (GREEN, "OK")
        } else {
            (RED, "FAILED")
        };
        let verdict = self.paint(&format!("{BOLD}{color}"), verdict);
        if details.is_empty() {
            verdict
        } else {
            format!("{verdict} ({})", details.join(", "))
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) {
        self.collected = test_count;
        if test_count == 0 {
            self.emit("No tests collected\n");
        }
    }

    fn on_test_start(&mut self, case: &str, method: &MethodInfo) {
        if self.verbosity == Verbosity::Verbose {
            self.emit(&format!("{} ({case}) ... ", method.name));
            self.flush();
        }
    }

    fn on_test_complete(&mut self, report: &MethodReport, _failures: &[FailureRecord]) {
        let color = Self::outcome_color(report.outcome);
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => {
                let code = report.outcome.short_code().to_string();
                let text = self.paint(color, &code);
                self.emit(&text);
                self.flush();
            }
            Verbosity::Verbose => {
                let tag = match (report.outcome, &report.reason) {
                    (Outcome::Skipped, Some(reason)) if !reason.is_empty() => format!("skipped '{reason}'"),
                    (outcome, _) => outcome.verbose_tag().to_string(),
                };
                let text = self.paint(color, &tag);
                self.emit(&format!("{text}\n"));
            }
        }
    }

    fn on_run_complete(&mut self, result: &RunResult) {
        if self.collected == 0 {
            self.flush();
            return;
        }
        if self.verbosity == Verbosity::Normal {
            self.emit("\n");
        }

        let blocks: Vec<String> = result
            .failures()
            .iter()
            .map(|f| self.failure_block(f))
            .collect();
        for block in blocks {
            self.emit(&block);
        }

        let noun = if result.total() == 1 { "test" } else { "tests" };
        let ran = if self.show_timing {
            format!("Ran {} {noun} in {:.3}s", result.total(), result.duration().as_secs_f64())
        } else {
            format!("Ran {} {noun}", result.total())
        };
        self.emit(&format!("{LIGHT_RULE}\n{ran}\n\n"));
        let summary = self.summary_line(result);
        self.emit(&format!("{summary}\n"));
        self.flush();
    }
}
