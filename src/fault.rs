//! Faults that end or mark a test method.
//!
//! A test body returns [`MethodResult`]. Its error side distinguishes an unmet expectation
//! ([`AssertionFailure`]) from a fault the test did not anticipate ([`Fault::Raised`],
//! [`Fault::Panicked`]); the runner turns the former into `failed` and the latter into `errored`.

use std::panic::Location;

use tally_core::TallyError;

/// Result type returned by test bodies, setup and teardown hooks.
pub type MethodResult = Result<(), Fault>;

/// An expectation that was not met.
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tally::assertion_failure))]
pub struct AssertionFailure {
    /// One-line description, e.g. `5 != 6`.
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Message supplied by the test author.
    pub note: Option<String>,
    pub location: &'static Location<'static>,
}

impl AssertionFailure {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
            note: None,
            location: Location::caller(),
        }
    }

    pub fn with_values(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        if !note.is_empty() {
            self.note = Some(note);
        }
        self
    }

    pub fn at(mut self, location: &'static Location<'static>) -> Self {
        self.location = location;
        self
    }
}

/// Everything that can end a test body, setup hook or teardown hook early.
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
pub enum Fault {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Assertion(#[from] AssertionFailure),

    /// The code under test returned an error the test propagated instead of asserting on.
    #[error("{0}")]
    #[diagnostic(
        code(tally::unexpected_fault),
        help("assert on this error with `assert_raises` if it is expected")
    )]
    Raised(#[from] TallyError),

    #[error("panicked: {message}")]
    #[diagnostic(code(tally::panic))]
    Panicked {
        message: String,
        location: Option<String>,
    },
}

impl Fault {
    pub fn is_assertion(&self) -> bool {
        matches!(self, Fault::Assertion(_))
    }

    /// Source location of the fault, when one is known.
    pub fn location(&self) -> Option<String> {
        match self {
            Fault::Assertion(failure) => Some(failure.location.to_string()),
            Fault::Raised(_) => None,
            Fault::Panicked { location, .. } => location.clone(),
        }
    }
}
