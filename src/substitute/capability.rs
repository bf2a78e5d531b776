//! Call-recording capability stubs.

use std::cell::RefCell;
use std::fmt;

type SideEffect<A, R> = Box<dyn FnMut(&A) -> R>;

/// Query surface shared by every recorded capability, used by the call assertions.
pub trait Recorded {
    type Args: fmt::Debug + PartialEq;

    fn name(&self) -> &str;
    fn call_count(&self) -> usize;
    fn calls(&self) -> Vec<Self::Args>;

    fn last_call(&self) -> Option<Self::Args> {
        self.calls().pop()
    }

    /// Check whether the capability was invoked exactly once, with `args`.
    fn was_called_once_with(&self, args: &Self::Args) -> bool {
        let calls = self.calls();
        calls.len() == 1 && calls.first() == Some(args)
    }
}

/// A stand-in for one capability of a collaborator.
///
/// `A` is the argument tuple recorded per call and `R` the value handed back. Answers come from
/// the side effect if one is set, otherwise the configured return value, otherwise
/// `R::default()`.
pub struct Capability<A, R> {
    name: String,
    returns: RefCell<Option<R>>,
    side_effect: RefCell<Option<SideEffect<A, R>>>,
    calls: RefCell<Vec<A>>,
}

impl<A, R> Capability<A, R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            returns: RefCell::new(None),
            side_effect: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Configure a fixed return value.
    pub fn returning(self, value: R) -> Self {
        self.set_return(value);
        self
    }

    pub fn set_return(&self, value: R) {
        *self.returns.borrow_mut() = Some(value);
    }

    /// Compute each answer from the call's arguments. Takes precedence over a fixed return value.
    pub fn with_side_effect(self, effect: impl FnMut(&A) -> R + 'static) -> Self {
        *self.side_effect.borrow_mut() = Some(Box::new(effect));
        self
    }

    /// Forget recorded calls; configured answers are kept.
    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<A, R: Clone + Default> Capability<A, R> {
    /// Record a call and answer it.
    pub fn invoke(&self, args: A) -> R {
        let answer = {
            let mut effect = self.side_effect.borrow_mut();
            match effect.as_mut() {
                Some(effect) => effect(&args),
                None => self.returns.borrow().clone().unwrap_or_default(),
            }
        };
        self.calls.borrow_mut().push(args);
        answer
    }
}

impl<A: Clone + fmt::Debug + PartialEq, R> Recorded for Capability<A, R> {
    type Args = A;

    fn name(&self) -> &str {
        &self.name
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn calls(&self) -> Vec<A> {
        self.calls.borrow().clone()
    }
}

impl<A: fmt::Debug, R: fmt::Debug> fmt::Debug for Capability<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("returns", &self.returns.borrow())
            .field("calls", &self.calls.borrow())
            .finish_non_exhaustive()
    }
}
