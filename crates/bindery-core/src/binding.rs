#![forbid(unsafe_code)]

//! The binding facade: one handle over entity state, change notification,
//! and validation orchestration.
//!
//! A [`Binding`] owns the current [`EntityState`] wrapper, a version counter
//! that ticks once per publication, the validator registry, an error slot,
//! and the optional tooltip notifier. Handles are cheap clones of one shared
//! core; everything is single-threaded.
//!
//! # Writes
//!
//! Writes come in two flavors:
//!
//! - [`Binding::set`] is a deferred write: the payload mutates in place,
//!   nothing is published, the version does not move. Readers holding the
//!   same [`DataRef`] observe the new value immediately.
//! - [`Binding::set_dynamic`] performs the same mutation, then publishes a
//!   fresh wrapper around the same payload so subscribers re-render.
//!
//! [`Binding::refresh`] publishes the current state unchanged, for hosts
//! that batch deferred writes and want one repaint at the end.
//!
//! # Example
//!
//! ```
//! use bindery_core::Binding;
//! use serde_json::json;
//!
//! let binding = Binding::new();
//!
//! binding.set("customer.name", json!("Ada"));
//! assert_eq!(binding.get("customer.name"), json!("Ada"));
//! assert_eq!(binding.version(), 0); // deferred write: no publication
//!
//! binding.set_dynamic("customer.name", json!("Grace"));
//! assert_eq!(binding.version(), 1);
//! ```
//!
//! # Invariants
//!
//! 1. The version increments exactly once per publication (`set_dynamic`,
//!    `set_mode` on an actual transition, `set_data` on an actual
//!    replacement, `refresh`, `teardown`).
//! 2. `set_mode` with the current mode and `set_data` with the installed
//!    payload handle are complete no-ops: no version bump, no notification.
//! 3. Subscribers observe the already-updated state; within a callback,
//!    `raw()` and the published wrapper agree.
//! 4. `validate` runs handlers in registration order, stops at the first
//!    failure, and leaves the failure in the error slot (or clears the slot
//!    on a clean pass).
//! 5. A re-entrant `validate` (from inside a handler) does not re-run the
//!    pass; it returns the currently stored error.
//! 6. `teardown` leaves the binding usable: fresh empty payload, `Create`
//!    mode, empty registry, clear error slot.
//!
//! # Failure Modes
//!
//! - Handler panic: contained by the registry's unwind boundary; the payload
//!   text is the failure message.
//! - Subscriber panic: propagates to the publisher; the state and version
//!   were already updated, so observers stay consistent.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::entity::{DataRef, EntityData, EntityMode, EntityState, shared_data};
use crate::notify::{SubscriberSet, Subscription};
use crate::path::{self, KeyPath};
use crate::tooltip::{TooltipNotifier, TooltipTarget};
use crate::validate::{ValidationHandler, ValidatorRegistry};

struct BindingInner {
    raw: RefCell<EntityState>,
    version: Cell<u64>,
    error: RefCell<Option<String>>,
    validators: ValidatorRegistry,
    subscribers: SubscriberSet,
    notifier: RefCell<Option<Rc<dyn TooltipNotifier>>>,
    validating: Cell<bool>,
}

/// Shared handle to one binding core. Clones are the same binding.
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl Clone for Binding {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning handle, for validation handlers and other long-lived closures
/// that must not keep the binding alive.
pub struct WeakBinding {
    inner: Weak<BindingInner>,
}

impl Clone for WeakBinding {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl WeakBinding {
    /// Recover a strong handle, if the binding still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Binding> {
        self.inner.upgrade().map(|inner| Binding { inner })
    }
}

impl fmt::Debug for WeakBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakBinding")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Reset-on-drop re-entrancy guard.
struct Latch<'a> {
    cell: &'a Cell<bool>,
}

impl<'a> Latch<'a> {
    fn acquire(cell: &'a Cell<bool>) -> Option<Self> {
        if cell.get() {
            None
        } else {
            cell.set(true);
            Some(Self { cell })
        }
    }
}

impl Drop for Latch<'_> {
    fn drop(&mut self) {
        self.cell.set(false);
    }
}

impl Binding {
    /// Fresh binding: empty payload, `Create` mode, no notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(EntityState::empty())
    }

    /// Binding over an owned payload.
    #[must_use]
    pub fn with_data(data: EntityData, mode: EntityMode) -> Self {
        Self::from_state(EntityState::new(shared_data(data), mode))
    }

    /// Binding over an existing shared payload handle.
    #[must_use]
    pub fn from_shared(data: DataRef, mode: EntityMode) -> Self {
        Self::from_state(EntityState::new(data, mode))
    }

    fn from_state(state: EntityState) -> Self {
        Self {
            inner: Rc::new(BindingInner {
                raw: RefCell::new(state),
                version: Cell::new(0),
                error: RefCell::new(None),
                validators: ValidatorRegistry::new(),
                subscribers: SubscriberSet::new(),
                notifier: RefCell::new(None),
                validating: Cell::new(false),
            }),
        }
    }

    /// Install a tooltip notifier, builder style.
    #[must_use]
    pub fn with_notifier(self, notifier: Rc<dyn TooltipNotifier>) -> Self {
        self.set_notifier(Some(notifier));
        self
    }

    /// Install or remove the tooltip notifier.
    pub fn set_notifier(&self, notifier: Option<Rc<dyn TooltipNotifier>>) {
        *self.inner.notifier.borrow_mut() = notifier;
    }

    /// Demote to a non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakBinding {
        WeakBinding {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same binding core.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    // ── reads ───────────────────────────────────────────────────────────

    /// Value at `path`, or `Value::Null` when the path misses (including the
    /// empty path).
    #[must_use]
    pub fn get(&self, path: &str) -> Value {
        let state = self.inner.raw.borrow();
        let data = state.data.borrow();
        path::lookup(&data, KeyPath::new(path))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Handle to the current payload.
    #[must_use]
    pub fn data(&self) -> DataRef {
        Rc::clone(&self.inner.raw.borrow().data)
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> EntityMode {
        self.inner.raw.borrow().mode
    }

    /// Clone of the current wrapper (shares the payload).
    #[must_use]
    pub fn raw(&self) -> EntityState {
        self.inner.raw.borrow().clone()
    }

    /// Publication counter. Starts at zero; ticks once per publication.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    #[must_use]
    pub fn is_create_mode(&self) -> bool {
        self.mode().is_create()
    }

    #[must_use]
    pub fn is_read_mode(&self) -> bool {
        self.mode().is_read()
    }

    #[must_use]
    pub fn is_edit_mode(&self) -> bool {
        self.mode().is_edit()
    }

    // ── writes ──────────────────────────────────────────────────────────

    /// Deferred write: mutate the payload in place, publish nothing.
    ///
    /// The empty path is a no-op. Intermediate mappings are created as
    /// needed; non-mapping intermediates are overwritten.
    pub fn set(&self, path: &str, value: impl Into<Value>) {
        self.write(path, value.into(), false);
    }

    /// Dynamic write: mutate the payload, then publish a fresh wrapper
    /// around the same payload so subscribers react.
    pub fn set_dynamic(&self, path: &str, value: impl Into<Value>) {
        self.write(path, value.into(), true);
    }

    fn write(&self, path: &str, value: Value, dynamic: bool) {
        let state = self.raw();
        path::store(&mut state.data.borrow_mut(), KeyPath::new(path), value);
        tracing::trace!(path, dynamic, "value written");
        if dynamic {
            self.publish(EntityState::new(state.data, state.mode));
        }
    }

    /// Switch mode. Setting the current mode is a complete no-op.
    pub fn set_mode(&self, mode: EntityMode) {
        let current = self.raw();
        if current.mode == mode {
            return;
        }
        tracing::debug!(from = %current.mode, to = %mode, "mode transition");
        self.publish(EntityState::new(current.data, mode));
    }

    /// Replace the payload, keeping the current mode.
    ///
    /// Passing the handle that is already installed is a complete no-op.
    pub fn set_data(&self, data: DataRef) {
        self.replace_data(data, None);
    }

    /// Replace the payload and the mode in one publication.
    ///
    /// The identity check is on the payload alone: passing the installed
    /// handle skips the publication even when `mode` differs. Use
    /// [`Binding::set_mode`] for a pure mode change.
    pub fn set_data_with_mode(&self, data: DataRef, mode: EntityMode) {
        self.replace_data(data, Some(mode));
    }

    fn replace_data(&self, data: DataRef, mode: Option<EntityMode>) {
        let current = self.raw();
        if current.same_data(&data) {
            return;
        }
        let mode = mode.unwrap_or(current.mode);
        tracing::debug!(%mode, "data replaced");
        self.publish(EntityState::new(data, mode));
    }

    /// Republish the current state unchanged. Bumps the version and notifies
    /// subscribers; the payload handle and mode are untouched.
    pub fn refresh(&self) {
        let current = self.raw();
        self.publish(current);
    }

    fn publish(&self, next: EntityState) {
        *self.inner.raw.borrow_mut() = next.clone();
        self.inner.version.set(self.inner.version.get() + 1);
        self.inner.subscribers.notify(&next);
    }

    // ── validation ──────────────────────────────────────────────────────

    /// Run the registered handlers in order; first failure wins.
    ///
    /// The failure (if any) is stored in the error slot; a clean pass clears
    /// the slot. A re-entrant call from inside a handler does not start a
    /// second pass: it returns the stored error as-is.
    pub fn validate(&self) -> Option<String> {
        let Some(_latch) = Latch::acquire(&self.inner.validating) else {
            tracing::trace!("re-entrant validate; returning stored error");
            return self.error();
        };

        let failure = self.inner.validators.first_failure();
        match &failure {
            Some(message) => {
                *self.inner.error.borrow_mut() = Some(message.clone());
            }
            None => {
                self.inner.error.borrow_mut().take();
            }
        }
        failure
    }

    /// Register a validation handler. Duplicate handles are ignored.
    pub fn add_validation_handler(&self, handler: ValidationHandler) {
        self.inner.validators.add(handler);
    }

    /// Remove a handler by identity. Unknown handles are ignored.
    pub fn remove_validation_handler(&self, handler: &ValidationHandler) {
        self.inner.validators.remove(handler);
    }

    /// Registered handler count.
    #[must_use]
    pub fn validation_handler_count(&self) -> usize {
        self.inner.validators.len()
    }

    // ── error slot ──────────────────────────────────────────────────────

    /// Currently stored failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.error.borrow().clone()
    }

    /// Store a failure message directly, outside a validation pass.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "error posted");
        *self.inner.error.borrow_mut() = Some(message);
    }

    /// Clear the error slot.
    pub fn clear_error(&self) {
        self.inner.error.borrow_mut().take();
    }

    // ── collaborators ───────────────────────────────────────────────────

    /// Forward a failure to the installed tooltip notifier.
    ///
    /// Without a notifier this is a no-op. The notifier applies its own
    /// rules (empty message, absent or inert target).
    pub fn show_tooltip(&self, target: Option<Rc<dyn TooltipTarget>>, message: &str) {
        let notifier = self.inner.notifier.borrow().clone();
        if let Some(notifier) = notifier {
            notifier.show(target, message);
        }
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Observe publications. The callback fires on every publication until
    /// the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&EntityState) + 'static) -> Subscription {
        self.inner.subscribers.subscribe(callback)
    }

    /// Live subscriber count.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.live_count()
    }

    /// Reset to the resting state: fresh empty payload, `Create` mode,
    /// empty registry, clear error slot. Published like any other
    /// transition, so subscribers observe the reset.
    pub fn teardown(&self) {
        tracing::debug!("binding teardown");
        self.inner.validators.clear();
        self.inner.error.borrow_mut().take();
        self.publish(EntityState::empty());
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("version", &self.version())
            .field("mode", &self.mode())
            .field("validators", &self.inner.validators.len())
            .field("subscribers", &self.subscriber_count())
            .field("has_error", &self.inner.error.borrow().is_some())
            .finish()
    }
}
