//! Provide the shared, pure vocabulary of the tally test runner.
//!
//! This crate is intentionally small and dependency-light. It holds the pieces that both the
//! runner and the code under test agree on:
//! - the fault taxonomy raised by collaborators ([`errors`]),
//! - the terminal states of a test method and its lifecycle ([`outcome`]),
//! - sub-case labels ([`label`]),
//! - the approximate-equality tolerance policy ([`numeric`]).
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no runner types.

pub mod errors;
pub mod label;
pub mod numeric;
pub mod outcome;

pub use errors::{ErrorKind, TallyError};
pub use label::Label;
pub use numeric::{DEFAULT_EPSILON, Tolerance};
pub use outcome::{MethodState, Outcome, TransitionError};
