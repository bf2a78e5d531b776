//! Patchable output seam.
//!
//! Code that prints goes through [`print`], so tests can swap the implementation with
//! [`printer`] and verify what would have been written.

use std::rc::Rc;

use crate::substitute::Patchable;

pub type PrintFn = Rc<dyn Fn(&str)>;

thread_local! {
    static PRINT: Patchable<PrintFn> = Patchable::new(Rc::new(|line: &str| println!("{line}")));
}

/// Write one line through the current implementation.
pub fn print(line: &str) {
    let print = PRINT.with(Patchable::get);
    print(line);
}

/// Handle to the `print` implementation of the current thread.
pub fn printer() -> Patchable<PrintFn> {
    PRINT.with(Patchable::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_patched_print_captures_lines() {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&lines);
        let fake: PrintFn = Rc::new(move |line: &str| sink.borrow_mut().push(line.to_string()));
        {
            let _patch = printer().patch(fake);
            print("hello");
        }
        assert_eq!(*lines.borrow(), vec!["hello".to_string()]);
        assert!(!printer().is_patched());
    }
}
