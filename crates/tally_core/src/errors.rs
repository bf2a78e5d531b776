//! Builtin fault vocabulary (named exception kinds).
//!
//! Code under test reports faults as [`TallyError`] values tagged with an [`ErrorKind`]. The
//! assertion engine matches on the kind (`assert_raises`), and the runner renders the canonical
//! `Kind: message` form in failure reports.

use std::fmt;

/// Classify a fault raised by code under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValueError,
    TypeError,
    ZeroDivisionError,
    IndexError,
    KeyError,
    AttributeError,
    RuntimeError,
}

/// Metadata for a builtin fault kind.
#[derive(Debug, Clone, Copy)]
pub struct ErrorKindInfo {
    pub id: ErrorKind,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// Registry of builtin fault kinds.
pub const ERROR_KINDS: &[ErrorKindInfo] = &[
    info(
        ErrorKind::ValueError,
        "ValueError",
        "An operation received a value of the right type but an invalid value.",
    ),
    info(
        ErrorKind::TypeError,
        "TypeError",
        "An operation received a value of an inappropriate type.",
    ),
    info(
        ErrorKind::ZeroDivisionError,
        "ZeroDivisionError",
        "Division or modulo by zero.",
    ),
    info(ErrorKind::IndexError, "IndexError", "An index is out of bounds."),
    info(ErrorKind::KeyError, "KeyError", "A mapping key is missing."),
    info(
        ErrorKind::AttributeError,
        "AttributeError",
        "A named attribute or capability does not exist on the target.",
    ),
    info(
        ErrorKind::RuntimeError,
        "RuntimeError",
        "A fault that fits no other kind.",
    ),
];

const fn info(id: ErrorKind, canonical: &'static str, description: &'static str) -> ErrorKindInfo {
    ErrorKindInfo {
        id,
        canonical,
        description,
    }
}

impl ErrorKind {
    /// Return the canonical spelling (e.g. `"ZeroDivisionError"`).
    pub fn as_str(self) -> &'static str {
        self.info().canonical
    }

    /// Return the user-facing description.
    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Resolve a canonical spelling to a kind. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        ERROR_KINDS.iter().find(|e| e.canonical == name).map(|e| e.id)
    }

    fn info(self) -> &'static ErrorKindInfo {
        // Every variant has a registry row; see `test_registry_is_complete`.
        match ERROR_KINDS.iter().find(|e| e.id == self) {
            Some(info) => info,
            None => &ERROR_KINDS[ERROR_KINDS.len() - 1],
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fault raised by code under test, rendered canonically as `Kind: message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TallyError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TallyError {
    /// Build an error of `kind` with a message.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The canonical `ZeroDivisionError: division by zero`.
    pub fn zero_division() -> Self {
        Self::with_message(ErrorKind::ZeroDivisionError, "division by zero")
    }

    /// An `AttributeError` for a capability the target does not provide.
    pub fn missing_attribute(target: &str, attribute: &str) -> Self {
        Self::with_message(
            ErrorKind::AttributeError,
            format!("'{target}' object has no attribute '{attribute}'"),
        )
    }

    /// Check whether this error is of `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}
