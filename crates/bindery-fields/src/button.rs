#![forbid(unsafe_code)]

//! Click controller with an optional validation gate.
//!
//! A [`ButtonController`] wraps a click handler. Unless marked `immediate`,
//! a button wired to a binding validates it first and swallows the click
//! when validation fails; the validation message stays on the binding. A
//! failing handler pushes its normalized message into the binding's error
//! slot; a succeeding one leaves the slot untouched.
//!
//! Re-entrant and disabled clicks are ignored: a `busy` latch is held from
//! the validation gate through the handler, so a validator or handler that
//! triggers another click on the same controller gets
//! [`ClickOutcome::Ignored`]. The latch resets even if the handler unwinds.

use std::cell::Cell;
use std::rc::Rc;

use bindery_core::{Binding, Value};
use tracing::{debug, trace};

use crate::report::{ActionError, ErrorReport};

/// Click handler: produces an optional result payload.
pub type ClickFn = Rc<dyn Fn() -> Result<Option<Value>, ActionError>>;

/// Terminal state of one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was swallowed: disabled, busy, or no handler installed.
    Ignored,
    /// The validation gate failed; the message stays on the binding.
    Invalid(String),
    /// The handler failed; the message was pushed to the binding.
    Failed(String),
    /// The handler ran; carries its result, if any.
    Completed(Option<Value>),
}

/// Drives one clickable control.
pub struct ButtonController {
    binding: Option<Binding>,
    on_click: Option<ClickFn>,
    immediate: bool,
    disabled: Cell<bool>,
    busy: Cell<bool>,
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

impl ButtonController {
    /// A button with no binding: clicks run unguarded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            binding: None,
            on_click: None,
            immediate: false,
            disabled: Cell::new(false),
            busy: Cell::new(false),
        }
    }

    /// A button gated by a binding's validators.
    #[must_use]
    pub fn for_binding(binding: &Binding) -> Self {
        Self {
            binding: Some(binding.clone()),
            ..Self::new()
        }
    }

    /// Install the click handler.
    #[must_use]
    pub fn on_click(
        mut self,
        handler: impl Fn() -> Result<Option<Value>, ActionError> + 'static,
    ) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// Skip the validation gate.
    #[must_use]
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Whether a click is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Run one click through the gate and the handler.
    pub fn click(&self) -> ClickOutcome {
        if self.disabled.get() {
            trace!("click ignored while disabled");
            return ClickOutcome::Ignored;
        }
        let Some(handler) = &self.on_click else {
            return ClickOutcome::Ignored;
        };
        let Some(_busy) = Latch::acquire(&self.busy) else {
            trace!("re-entrant click ignored");
            return ClickOutcome::Ignored;
        };

        if !self.immediate
            && let Some(binding) = &self.binding
            && let Some(message) = binding.validate()
        {
            debug!(%message, "click blocked by validation");
            return ClickOutcome::Invalid(message);
        }

        match handler() {
            Ok(result) => ClickOutcome::Completed(result),
            Err(error) => {
                let report = ErrorReport::from(error);
                let message = report.summary();
                if let Some(binding) = &self.binding {
                    match &report.message {
                        Some(text) => binding.set_error(text.clone()),
                        None => binding.clear_error(),
                    }
                }
                debug!(%message, "click handler failed");
                ClickOutcome::Failed(message)
            }
        }
    }
}

impl Default for ButtonController {
    fn default() -> Self {
        Self::new()
    }
}
