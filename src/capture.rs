//! Panic isolation boundary.
//!
//! Every setup hook, test body, sub-case and teardown hook runs inside [`catch`]. A panic there is
//! turned into [`Fault::Panicked`] instead of unwinding into the runner. While a capture is active
//! on the current thread the default panic message is suppressed (the report carries it instead);
//! panics on other threads, or outside a capture, still reach the previously installed hook.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::fault::Fault;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let location = info.location().map(|l| l.to_string());
                tracing::trace!(location = ?location, "panic captured");
                LAST_LOCATION.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, converting a panic into [`Fault::Panicked`].
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, Fault> {
    install_hook();
    let was_capturing = CAPTURING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|c| c.set(was_capturing));

    result.map_err(|payload| Fault::Panicked {
        message: payload_message(payload.as_ref()),
        location: LAST_LOCATION.with(|slot| slot.borrow_mut().take()),
    })
}

/// Run a fallible hook or body, flattening its own fault and a panic into one result.
pub fn catch_fault(f: impl FnOnce() -> Result<(), Fault>) -> Result<(), Fault> {
    catch(f).and_then(|result| result)
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_returns_value() {
        assert_eq!(catch(|| 41 + 1), Ok(42));
    }

    #[test]
    fn test_catch_converts_panic() {
        let result: Result<(), Fault> = catch(|| panic!("boom {}", 7));
        match result {
            Err(Fault::Panicked { message, location }) => {
                assert_eq!(message, "boom 7");
                assert!(location.is_some_and(|l| l.contains("capture.rs")));
            }
            other => panic!("expected a captured panic, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_capture_restores_flag() {
        let outer = catch(|| {
            let inner: Result<(), Fault> = catch(|| panic!("inner"));
            assert!(inner.is_err());
            CAPTURING.with(Cell::get)
        });
        assert_eq!(outer, Ok(true));
        assert!(!CAPTURING.with(Cell::get));
    }

    #[test]
    fn test_catch_fault_flattens() {
        let fault = Fault::Panicked {
            message: "x".into(),
            location: None,
        };
        let expected = fault.clone();
        assert_eq!(catch_fault(move || Err(fault)), Err(expected));
        assert_eq!(catch_fault(|| Ok(())), Ok(()));
    }
}
