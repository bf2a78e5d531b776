//! Dependency substitutes and patching.
//!
//! - [`Capability`] is a call-recording stand-in for one capability of a collaborator. A stub
//!   for a collaborator trait holds one `Capability` per trait method and delegates to it.
//! - [`Patchable`] is a replaceable slot (an attribute or a method implementation) that tests can
//!   temporarily override; the override is undone when its [`Patch`] guard drops.

pub mod capability;
pub mod patch;

pub use capability::{Capability, Recorded};
pub use patch::{Patch, Patchable};
