#![forbid(unsafe_code)]

//! Validator registry and first-failure orchestration.
//!
//! Handlers are `Rc<dyn Fn() -> Option<String>>` closures registered against
//! a [`ValidatorRegistry`]. The registry is insertion-ordered and
//! identity-deduplicated: registering the same `Rc` twice is a no-op, and
//! removal matches by pointer, never by comparing closures.
//!
//! A handler reports success by returning `None` or `Some("")`; any other
//! string is a failure message. [`ValidatorRegistry::first_failure`] runs
//! handlers in registration order and stops at the first failure.
//!
//! Handlers run behind an unwind boundary: a panicking handler does not
//! poison the pass. Its panic payload is captured as text and treated
//! exactly like a returned message, so `panic!("boom")` fails the pass with
//! `"boom"` while `panic!("")` passes and the next handler still runs.
//!
//! # Invariants
//!
//! 1. Execution order is registration order.
//! 2. Duplicate registration (same `Rc`) is a no-op; order keeps the
//!    original slot.
//! 3. `first_failure` never runs a handler after the first failing one.
//! 4. The registry iterates a snapshot: a handler may register or remove
//!    handlers mid-pass without corrupting iteration. Additions are picked
//!    up on the next pass.
//!
//! # Failure Modes
//!
//! | Handler outcome      | Treated as                                  |
//! |----------------------|---------------------------------------------|
//! | `None` / `Some("")`  | pass, continue                              |
//! | `Some(message)`      | failure, stop                               |
//! | `panic!(message)`    | same as returning `Some(message.into())`    |
//! | panic, odd payload   | failure with a generic fault message        |

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// A per-field validation callback.
///
/// `None` or an empty string means the check passed; a non-empty string is
/// the failure message. Handle identity is the `Rc` pointer.
pub type ValidationHandler = Rc<dyn Fn() -> Option<String>>;

/// Wrap a closure as a registrable [`ValidationHandler`].
#[must_use]
pub fn handler(f: impl Fn() -> Option<String> + 'static) -> ValidationHandler {
    Rc::new(f)
}

/// Insertion-ordered, identity-deduplicated collection of validation
/// handlers.
#[derive(Default)]
pub struct ValidatorRegistry {
    handlers: RefCell<Vec<ValidationHandler>>,
}

impl ValidatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`, keeping registration order. Re-registering the
    /// same `Rc` is a no-op.
    pub fn add(&self, handler: ValidationHandler) {
        let mut handlers = self.handlers.borrow_mut();
        if handlers.iter().any(|known| Rc::ptr_eq(known, &handler)) {
            return;
        }
        handlers.push(handler);
    }

    /// Remove `handler` by pointer identity. Unknown handlers are ignored.
    pub fn remove(&self, handler: &ValidationHandler) {
        self.handlers
            .borrow_mut()
            .retain(|known| !Rc::ptr_eq(known, handler));
    }

    /// Whether `handler` is currently registered.
    #[must_use]
    pub fn contains(&self, handler: &ValidationHandler) -> bool {
        self.handlers
            .borrow()
            .iter()
            .any(|known| Rc::ptr_eq(known, handler))
    }

    /// Drop every registered handler.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Run every handler in registration order and return the first failure
    /// message, or `None` when all pass.
    ///
    /// Iterates a snapshot taken up front, so handlers may mutate the
    /// registry mid-pass.
    #[must_use]
    pub fn first_failure(&self) -> Option<String> {
        let snapshot: Vec<ValidationHandler> = self.handlers.borrow().clone();
        for (index, handler) in snapshot.iter().enumerate() {
            if let Some(message) = invoke_isolated(handler)
                && !message.is_empty()
            {
                tracing::debug!(index, %message, "validation failed");
                return Some(message);
            }
        }
        None
    }
}

/// Invoke a handler behind an unwind boundary.
///
/// A panic is converted into the handler's result: the payload text becomes
/// the returned message, so the caller applies the usual empty-means-pass
/// rule to faults too.
#[must_use]
pub fn invoke_isolated(handler: &ValidationHandler) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler())) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_text(payload.as_ref());
            tracing::warn!(%message, "validation handler panicked");
            Some(message)
        }
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "validation handler panicked".to_string()
    }
}
