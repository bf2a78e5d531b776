//! Temporary, guaranteed-reversible replacement of a value.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

/// A shared slot whose value tests may temporarily replace.
///
/// Cloning a `Patchable` yields another handle to the same slot, so a collaborator and a test can
/// both hold one. Thread-local "method tables" are built from it as well.
pub struct Patchable<T> {
    slot: Rc<RefCell<T>>,
    stack: Rc<RefCell<PatchStack<T>>>,
}

/// Originals displaced by the live patches, oldest first.
///
/// Each entry holds the value its patch replaced. Removing an entry below the top hands its
/// original to the entry above, so whichever guard drops last still restores the first value.
struct PatchStack<T> {
    next_id: u64,
    entries: Vec<(u64, T)>,
}

impl<T> Patchable<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(value)),
            stack: Rc::new(RefCell::new(PatchStack { next_id: 0, entries: Vec::new() })),
        }
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow())
    }

    /// Install `value` until the returned guard drops.
    ///
    /// Guards may drop in any order; once all of them have dropped the slot holds the value it had
    /// before the first patch.
    #[must_use = "the original value is restored as soon as the guard drops"]
    pub fn patch(&self, value: T) -> Patch<T> {
        let original = mem::replace(&mut *self.slot.borrow_mut(), value);
        let mut stack = self.stack.borrow_mut();
        let id = stack.next_id;
        stack.next_id += 1;
        stack.entries.push((id, original));
        Patch {
            slot: Rc::clone(&self.slot),
            stack: Rc::clone(&self.stack),
            id,
        }
    }

    /// Check whether any patch is currently installed.
    pub fn is_patched(&self) -> bool {
        !self.stack.borrow().entries.is_empty()
    }
}

impl<T: Clone> Patchable<T> {
    /// Copy of the current value.
    pub fn get(&self) -> T {
        self.slot.borrow().clone()
    }
}

impl<T> Clone for Patchable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            stack: Rc::clone(&self.stack),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Patchable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patchable")
            .field("value", &self.slot.borrow())
            .field("patched", &self.is_patched())
            .finish()
    }
}

/// Guard restoring a [`Patchable`]'s original value on drop, including during unwinding.
pub struct Patch<T> {
    slot: Rc<RefCell<T>>,
    stack: Rc<RefCell<PatchStack<T>>>,
    id: u64,
}

impl<T> Drop for Patch<T> {
    fn drop(&mut self) {
        let Ok(mut stack) = self.stack.try_borrow_mut() else {
            tracing::warn!("patch stack is borrowed while restoring; original not restored");
            return;
        };
        let Some(pos) = stack.entries.iter().position(|(id, _)| *id == self.id) else {
            return;
        };
        let (_, original) = stack.entries.remove(pos);

        if let Some((_, above)) = stack.entries.get_mut(pos) {
            // A newer patch is still live; it now owes the slot this original.
            *above = original;
            return;
        }
        match self.slot.try_borrow_mut() {
            Ok(mut slot) => *slot = original,
            Err(_) => {
                tracing::warn!("patched value is borrowed while restoring; original not restored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_and_restore() {
        let salutation = Patchable::new("Hello".to_string());
        {
            let _patch = salutation.patch("Howdy".to_string());
            assert_eq!(salutation.get(), "Howdy");
            assert!(salutation.is_patched());
        }
        assert_eq!(salutation.get(), "Hello");
        assert!(!salutation.is_patched());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let a = Patchable::new(1);
        let b = a.clone();
        let _patch = a.patch(2);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn test_nested_patches_unwind_in_order() {
        let value = Patchable::new(0);
        let first = value.patch(1);
        let second = value.patch(2);
        assert_eq!(value.get(), 2);
        drop(second);
        assert_eq!(value.get(), 1);
        drop(first);
        assert_eq!(value.get(), 0);
    }

    #[test]
    fn test_out_of_order_drops_restore_the_original() {
        let value = Patchable::new(0);
        let first = value.patch(1);
        let second = value.patch(2);
        drop(first);
        assert_eq!(value.get(), 2);
        assert!(value.is_patched());
        drop(second);
        assert_eq!(value.get(), 0);
        assert!(!value.is_patched());
    }

    #[test]
    fn test_middle_guard_dropped_first() {
        let value = Patchable::new("a");
        let first = value.patch("b");
        let second = value.patch("c");
        let third = value.patch("d");
        drop(second);
        assert_eq!(value.get(), "d");
        drop(third);
        assert_eq!(value.get(), "b");
        drop(first);
        assert_eq!(value.get(), "a");
    }

    #[test]
    fn test_restored_when_unwinding() {
        let value = Patchable::new(10);
        let handle = value.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _patch = handle.patch(99);
            panic!("mid-test panic");
        }));
        assert!(result.is_err());
        assert_eq!(value.get(), 10);
    }

    #[test]
    fn test_with_borrows() {
        let items = Patchable::new(vec![1, 2, 3]);
        assert_eq!(items.with(|v| v.len()), 3);
    }
}
