#![forbid(unsafe_code)]

//! Form field models for Bindery.
//!
//! Each field couples a [`Binding`](bindery_core::Binding) path to an edit
//! buffer, a validation handler, and a recording [`InputTarget`]: text,
//! number, decimal, email, and password inputs, plus the form and button
//! controllers that drive submission.
//!
//! Fields register their handler on construction and deregister it on drop,
//! so validation order follows field construction order. Every field also
//! subscribes to the binding and refreshes its buffer from published state
//! while unfocused; keystrokes are written back through the binding in the
//! field's configured write mode (deferred or dynamic).

pub mod button;
pub mod config;
pub mod decimal;
pub mod email;
pub mod form;
pub mod format;
pub mod number;
pub mod password;
pub mod report;
pub mod target;
pub mod text;

pub use button::{ButtonController, ClickOutcome};
pub use config::{FieldConfig, TextAlign, TextCase};
pub use decimal::DecimalField;
pub use email::EmailField;
pub use form::{FormController, SubmitOutcome};
pub use number::NumberField;
pub use password::PasswordField;
pub use report::{ActionError, ErrorReport};
pub use target::InputTarget;
pub use text::TextField;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_core::{Binding, EntityMode, Value};

/// Tooltip text for an empty required field.
pub(crate) const REQUIRED_HINT: &str = "Please fill out this field";

/// Aggregate message for an empty required field.
pub(crate) fn required_message(label: &str) -> String {
    format!("{label} field is required")
}

/// Edit-buffer state shared between a field and its closures.
pub(crate) struct InputState {
    pub(crate) buffer: RefCell<String>,
    pub(crate) focused: Cell<bool>,
    pub(crate) touched: Cell<bool>,
    pub(crate) target: Rc<InputTarget>,
}

impl InputState {
    pub(crate) fn new(initial: String) -> Rc<Self> {
        Rc::new(Self {
            buffer: RefCell::new(initial),
            focused: Cell::new(false),
            touched: Cell::new(false),
            target: Rc::new(InputTarget::new()),
        })
    }

    pub(crate) fn value(&self) -> String {
        self.buffer.borrow().clone()
    }

    pub(crate) fn set_value(&self, value: String) {
        *self.buffer.borrow_mut() = value;
    }
}

/// Write a value through the binding in the field's configured mode.
pub(crate) fn write_value(binding: &Binding, config: &FieldConfig, value: Value) {
    if config.dynamic {
        binding.set_dynamic(&config.name, value);
    } else {
        binding.set(&config.name, value);
    }
}

/// Mirror config flags and entity mode onto the field's target.
///
/// Read mode disables the control regardless of config.
pub(crate) fn sync_target(target: &InputTarget, config: &FieldConfig, mode: EntityMode) {
    target.set_disabled(config.disabled || mode.is_read());
    target.set_read_only(config.read_only);
}
