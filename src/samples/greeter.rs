//! A greeter that depends on an external name provider.

use std::fmt;
use std::rc::Rc;

use crate::substitute::{Capability, Patchable};

/// The single capability [`Greeter`] needs from its dependency.
pub trait NameProvider {
    fn get_name(&self) -> String;
}

impl<P: NameProvider + ?Sized> NameProvider for Rc<P> {
    fn get_name(&self) -> String {
        (**self).get_name()
    }
}

/// Provider with a fixed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticName(pub String);

impl NameProvider for StaticName {
    fn get_name(&self) -> String {
        self.0.clone()
    }
}

/// Call-recording stand-in for a [`NameProvider`].
///
/// Share it with the greeter through an `Rc` and keep a handle to query the recorded calls.
#[derive(Debug)]
pub struct StubNameProvider {
    pub get_name: Capability<(), String>,
}

impl Default for StubNameProvider {
    fn default() -> Self {
        Self {
            get_name: Capability::new("get_name"),
        }
    }
}

impl StubNameProvider {
    pub fn returning(name: impl Into<String>) -> Self {
        Self {
            get_name: Capability::new("get_name").returning(name.into()),
        }
    }
}

impl NameProvider for StubNameProvider {
    fn get_name(&self) -> String {
        self.get_name.invoke(())
    }
}

/// Implementation behind [`Greeter::greet`].
pub type GreetFn = Rc<dyn Fn(&Greeter) -> String>;

thread_local! {
    static GREET: Patchable<GreetFn> = Patchable::new(Rc::new(Greeter::standard_greeting));
}

pub struct Greeter {
    provider: Box<dyn NameProvider>,
    salutation: Patchable<String>,
}

impl Greeter {
    pub fn new(provider: impl NameProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            salutation: Patchable::new("Hello".to_string()),
        }
    }

    /// `"Hello, {name}!"`, asking the provider for the name.
    pub fn greet(&self) -> String {
        let greet = GREET.with(Patchable::get);
        greet(self)
    }

    /// The word in front of the name; patch it to change this greeter's salutation.
    pub fn salutation(&self) -> &Patchable<String> {
        &self.salutation
    }

    /// Handle to the `greet` implementation shared by every greeter on this thread.
    pub fn greet_method() -> Patchable<GreetFn> {
        GREET.with(Patchable::clone)
    }

    fn standard_greeting(&self) -> String {
        let name = self.provider.get_name();
        self.salutation.with(|salutation| format!("{salutation}, {name}!"))
    }
}

impl fmt::Debug for Greeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Greeter")
            .field("salutation", &self.salutation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitute::Recorded;

    #[test]
    fn test_greet_with_static_name() {
        let greeter = Greeter::new(StaticName("Ada".into()));
        assert_eq!(greeter.greet(), "Hello, Ada!");
    }

    #[test]
    fn test_stub_records_calls() {
        let stub = Rc::new(StubNameProvider::returning("Aharon"));
        let greeter = Greeter::new(Rc::clone(&stub));
        assert_eq!(greeter.greet(), "Hello, Aharon!");
        assert_eq!(stub.get_name.call_count(), 1);
    }

    #[test]
    fn test_unconfigured_stub_returns_empty_name() {
        let greeter = Greeter::new(StubNameProvider::default());
        assert_eq!(greeter.greet(), "Hello, !");
    }

    #[test]
    fn test_patched_salutation() {
        let greeter = Greeter::new(StaticName("Ada".into()));
        {
            let _patch = greeter.salutation().patch("Howdy".into());
            assert_eq!(greeter.greet(), "Howdy, Ada!");
        }
        assert_eq!(greeter.greet(), "Hello, Ada!");
    }

    #[test]
    fn test_patched_greet_method() {
        let fake: GreetFn = Rc::new(|_: &Greeter| "patched!".to_string());
        let patch = Greeter::greet_method().patch(fake);
        assert_eq!(Greeter::new(StubNameProvider::default()).greet(), "patched!");
        drop(patch);
        assert_eq!(Greeter::new(StaticName("Ada".into())).greet(), "Hello, Ada!");
    }
}
