//! Machine-readable report.
//!
//! Nothing is printed while methods run; the whole document is written on completion:
//!
//! ```json
//! {
//!   "summary": { "total": 3, "passed": 2, "failed": 1, ..., "successful": false },
//!   "tests": [ { "case": "...", "method": "...", "outcome": "passed", ... } ],
//!   "failures": [ { "case": "...", "kind": "assertion", "message": "1 != 2", ... } ]
//! }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use super::TestReporter;
use crate::result::{FailureRecord, MethodReport, RunResult};

pub struct JsonReporter<W: Write> {
    out: W,
    show_timing: bool,
    error: Option<io::Error>,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_timing: true,
            error: None,
        }
    }

    /// Leave `duration_ms` fields out.
    pub fn with_timing(mut self, show_timing: bool) -> Self {
        self.show_timing = show_timing;
        self
    }

    /// Hand back the sink, or the write error.
    pub fn into_inner(mut self) -> io::Result<W> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    /// Build the report document for `result`.
    pub fn document(&self, result: &RunResult) -> Value {
        let mut summary = serde_json::Map::new();
        summary.insert("total".into(), json!(result.total()));
        for (outcome, count) in result.counts() {
            summary.insert(outcome.as_str().into(), json!(count));
        }
        summary.insert("successful".into(), json!(result.was_successful()));
        if self.show_timing {
            summary.insert("duration_ms".into(), json!(result.duration().as_millis() as u64));
        }

        let tests: Vec<Value> = result.reports().iter().map(|r| self.test_entry(r)).collect();
        let failures: Vec<Value> = result.failures().iter().map(failure_entry).collect();
        let expected: Vec<Value> = result.expected_failures().iter().map(failure_entry).collect();

        json!({
            "summary": Value::Object(summary),
            "tests": tests,
            "failures": failures,
            "expected_failures": expected,
        })
    }

    fn test_entry(&self, report: &MethodReport) -> Value {
        let mut entry = json!({
            "case": report.case,
            "method": report.method,
            "outcome": report.outcome.as_str(),
            "reason": report.reason,
            "checks": report.checks,
            "subcases": report.subcases,
        });
        if self.show_timing {
            entry["duration_ms"] = json!(report.duration.as_millis() as u64);
        }
        entry
    }
}

fn failure_entry(failure: &FailureRecord) -> Value {
    json!({
        "case": failure.case,
        "method": failure.method,
        "label": failure.label.as_ref().map(ToString::to_string),
        "kind": failure.kind.as_str(),
        "message": failure.message,
        "expected": failure.expected,
        "actual": failure.actual,
        "note": failure.note,
        "location": failure.location,
        "code": failure.code,
    })
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) {
        tracing::debug!(test_count, "collected");
    }

    fn on_test_complete(&mut self, _report: &MethodReport, _failures: &[FailureRecord]) {}

    fn on_run_complete(&mut self, result: &RunResult) {
        let document = self.document(result);
        let written = serde_json::to_string_pretty(&document)
            .map_err(io::Error::other)
            .and_then(|text| writeln!(self.out, "{text}"))
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}
