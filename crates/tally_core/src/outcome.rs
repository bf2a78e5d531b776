//! Terminal states of a test method and the lifecycle that reaches them.
//!
//! ```text
//! Pending ──start──▶ Running ──finish──▶ Finished(Passed | Failed | Errored
//!    │                                            | ExpectedFailure | UnexpectedSuccess)
//!    └────────skip─────────────────────▶ Finished(Skipped)
//! ```

use std::fmt;

/// How a single test method ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Passed,
    Failed,
    Errored,
    Skipped,
    /// Failed as predicted by an expected-failure marker; counted as success.
    ExpectedFailure,
    /// Passed despite an expected-failure marker; counted against the run.
    UnexpectedSuccess,
}

impl Outcome {
    /// Every outcome, in reporting order.
    pub const ALL: [Outcome; 6] = [
        Outcome::Passed,
        Outcome::Failed,
        Outcome::Errored,
        Outcome::Skipped,
        Outcome::ExpectedFailure,
        Outcome::UnexpectedSuccess,
    ];

    /// Stable position of this outcome in [`Outcome::ALL`].
    pub fn index(self) -> usize {
        match self {
            Outcome::Passed => 0,
            Outcome::Failed => 1,
            Outcome::Errored => 2,
            Outcome::Skipped => 3,
            Outcome::ExpectedFailure => 4,
            Outcome::UnexpectedSuccess => 5,
        }
    }

    /// Check whether this outcome makes the whole run unsuccessful.
    ///
    /// ## Returns
    /// - (`bool`): `true` for `Failed`, `Errored` and `UnexpectedSuccess`.
    pub fn fails_run(self) -> bool {
        matches!(
            self,
            Outcome::Failed | Outcome::Errored | Outcome::UnexpectedSuccess
        )
    }

    /// Machine-friendly name (`"expected_failure"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Errored => "errored",
            Outcome::Skipped => "skipped",
            Outcome::ExpectedFailure => "expected_failure",
            Outcome::UnexpectedSuccess => "unexpected_success",
        }
    }

    /// One-character progress marker used by minimal output.
    pub fn short_code(self) -> char {
        match self {
            Outcome::Passed => '.',
            Outcome::Failed => 'F',
            Outcome::Errored => 'E',
            Outcome::Skipped => 's',
            Outcome::ExpectedFailure => 'x',
            Outcome::UnexpectedSuccess => 'u',
        }
    }

    /// Word used by one-line-per-method output (`test_x (Case) ... ok`).
    pub fn verbose_tag(self) -> &'static str {
        match self {
            Outcome::Passed => "ok",
            Outcome::Failed => "FAIL",
            Outcome::Errored => "ERROR",
            Outcome::Skipped => "skipped",
            Outcome::ExpectedFailure => "expected failure",
            Outcome::UnexpectedSuccess => "unexpected success",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid method transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

/// Lifecycle of one test method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodState {
    #[default]
    Pending,
    Running,
    Finished(Outcome),
}

impl MethodState {
    /// `Pending → Running`.
    pub fn start(self) -> Result<Self, TransitionError> {
        match self {
            MethodState::Pending => Ok(MethodState::Running),
            other => Err(other.rejected("running")),
        }
    }

    /// `Pending → Finished(Skipped)`. A skipped method never enters `Running`.
    pub fn skip(self) -> Result<Self, TransitionError> {
        match self {
            MethodState::Pending => Ok(MethodState::Finished(Outcome::Skipped)),
            other => Err(other.rejected(Outcome::Skipped.as_str())),
        }
    }

    /// `Running → Finished(outcome)` for every outcome except `Skipped`.
    pub fn finish(self, outcome: Outcome) -> Result<Self, TransitionError> {
        match (self, outcome) {
            (MethodState::Running, Outcome::Skipped) => Err(self.rejected(outcome.as_str())),
            (MethodState::Running, _) => Ok(MethodState::Finished(outcome)),
            (other, _) => Err(other.rejected(outcome.as_str())),
        }
    }

    /// The terminal outcome, once reached.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            MethodState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn rejected(self, to: &str) -> TransitionError {
        TransitionError {
            from: self.to_string(),
            to: to.to_string(),
        }
    }
}

impl fmt::Display for MethodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodState::Pending => f.write_str("pending"),
            MethodState::Running => f.write_str("running"),
            MethodState::Finished(outcome) => write!(f, "{outcome}"),
        }
    }
}
