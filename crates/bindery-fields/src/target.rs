#![forbid(unsafe_code)]

//! Headless input surface.
//!
//! [`InputTarget`] is the concrete [`TooltipTarget`] every field model
//! carries: a disabled/read-only flag pair, a validity message slot, and a
//! counter of focus-and-report requests. Rendering hosts mirror these onto
//! whatever widget actually draws the field; tests read them directly.
//!
//! The disabled flag is the *effective* one: a field syncs it from its own
//! configuration OR'd with the binding being in read mode, so the notifier's
//! inert-target rule observes the same state the rendered control would.

use std::cell::{Cell, RefCell};
use std::fmt;

use bindery_core::TooltipTarget;

/// Recording implementation of [`TooltipTarget`].
#[derive(Default)]
pub struct InputTarget {
    disabled: Cell<bool>,
    read_only: Cell<bool>,
    validity: RefCell<Option<String>>,
    focus_reports: Cell<u32>,
}

impl InputTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    /// Current validity message, if the surface is marked invalid.
    #[must_use]
    pub fn validity(&self) -> Option<String> {
        self.validity.borrow().clone()
    }

    /// How many focus-and-report requests have landed on this surface.
    #[must_use]
    pub fn focus_reports(&self) -> u32 {
        self.focus_reports.get()
    }
}

impl TooltipTarget for InputTarget {
    fn is_disabled(&self) -> bool {
        InputTarget::is_disabled(self)
    }

    fn is_read_only(&self) -> bool {
        InputTarget::is_read_only(self)
    }

    fn set_validity(&self, message: &str) {
        *self.validity.borrow_mut() = Some(message.to_string());
    }

    fn clear_validity(&self) {
        self.validity.borrow_mut().take();
    }

    fn focus_and_report(&self) {
        self.focus_reports.set(self.focus_reports.get() + 1);
        tracing::trace!("focus and report requested");
    }
}

impl fmt::Debug for InputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputTarget")
            .field("disabled", &self.disabled.get())
            .field("read_only", &self.read_only.get())
            .field("validity", &*self.validity.borrow())
            .field("focus_reports", &self.focus_reports.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_enabled_and_clear() {
        let target = InputTarget::new();
        assert!(!target.is_disabled());
        assert!(!target.is_read_only());
        assert_eq!(target.validity(), None);
        assert_eq!(target.focus_reports(), 0);
    }

    #[test]
    fn validity_slot_sets_and_clears() {
        let target = InputTarget::new();
        target.set_validity("Please fill out this field");
        assert_eq!(
            target.validity().as_deref(),
            Some("Please fill out this field")
        );

        target.clear_validity();
        assert_eq!(target.validity(), None);
    }

    #[test]
    fn flags_and_reports_record() {
        let target = InputTarget::new();
        target.set_disabled(true);
        target.set_read_only(true);
        target.focus_and_report();
        target.focus_and_report();

        assert!(target.is_disabled());
        assert!(target.is_read_only());
        assert_eq!(target.focus_reports(), 2);
    }
}
