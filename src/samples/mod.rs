//! Sample collaborators and the sample test groups that exercise them.
//!
//! The collaborators are placeholders: `add` and `divide` are pure, and [`Greeter`] depends on a
//! single `get_name` capability. [`suites::registry`] builds the groups the `tally` binary runs.

pub mod console;
pub mod greeter;
pub mod math;
pub mod suites;

pub use greeter::{Greeter, NameProvider, StaticName, StubNameProvider};
pub use math::{add, divide};
