#![forbid(unsafe_code)]

//! Email field.
//!
//! Shape checking happens on every keystroke and surfaces immediately
//! through a field-local inline error; only shaped addresses reach the
//! binding. The shape test is deliberately loose: one `@`, no whitespace,
//! a dotted domain. Anything stricter belongs to whoever receives the
//! address.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use bindery_core::{
    Binding, KeyPath, Subscription, TooltipTarget, ValidationHandler, Value, path, validate,
};
use regex::Regex;

use crate::config::FieldConfig;
use crate::format::text_from_value;
use crate::target::InputTarget;
use crate::{InputState, REQUIRED_HINT, required_message, sync_target, write_value};

const INVALID_EMAIL: &str = "Must contain a valid email address";
const DEFAULT_PLACEHOLDER: &str = "you@example.com";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

fn is_shaped(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// An email input bound to a path.
pub struct EmailField {
    binding: Binding,
    config: FieldConfig,
    state: Rc<InputState>,
    inline_error: RefCell<Option<String>>,
    handler: ValidationHandler,
    _watch: Subscription,
}

impl EmailField {
    pub fn new(binding: &Binding, mut config: FieldConfig) -> Self {
        if config.placeholder.is_none() {
            config.placeholder = Some(DEFAULT_PLACEHOLDER.to_string());
        }

        let state = InputState::new(text_from_value(&binding.get(&config.name)));
        sync_target(&state.target, &config, binding.mode());

        let handler = {
            let weak = binding.downgrade();
            let state = Rc::clone(&state);
            let required = config.required;
            let label = config.display_label().to_string();
            validate::handler(move || {
                let value = state.value();
                let tooltip = |message: &str| {
                    if let Some(binding) = weak.upgrade() {
                        let target = Rc::clone(&state.target) as Rc<dyn TooltipTarget>;
                        binding.show_tooltip(Some(target), message);
                    }
                };
                if required && value.is_empty() {
                    tooltip(REQUIRED_HINT);
                    return Some(required_message(&label));
                }
                if !value.is_empty() && !is_shaped(&value) {
                    tooltip(INVALID_EMAIL);
                    return Some(format!("{label}: {INVALID_EMAIL}"));
                }
                None
            })
        };
        binding.add_validation_handler(Rc::clone(&handler));

        let watch = {
            let state = Rc::clone(&state);
            let name = config.name.clone();
            let disabled = config.disabled;
            let read_only = config.read_only;
            binding.subscribe(move |published| {
                state.target.set_disabled(disabled || published.mode.is_read());
                state.target.set_read_only(read_only);
                if state.focused.get() {
                    return;
                }
                let value = {
                    let data = published.data.borrow();
                    path::lookup(&data, KeyPath::new(&name)).cloned().unwrap_or(Value::Null)
                };
                let shown = text_from_value(&value);
                if shown != *state.buffer.borrow() {
                    state.set_value(shown);
                }
            })
        };

        Self {
            binding: binding.clone(),
            config,
            state,
            inline_error: RefCell::new(None),
            handler,
            _watch: watch,
        }
    }

    /// Feed one edit.
    ///
    /// A repeated identical edit only clears the inline error; nothing is
    /// written. Otherwise the shape check decides whether the address or
    /// null lands in the binding.
    pub fn input(&self, raw: &str) {
        self.state.target.clear_validity();
        let previous = self.state.value();
        self.state.set_value(raw.to_string());
        if previous == raw {
            self.inline_error.borrow_mut().take();
            return;
        }
        let shaped = self.check_shape(raw);
        let value = if shaped && !raw.is_empty() {
            Value::from(raw)
        } else {
            Value::Null
        };
        write_value(&self.binding, &self.config, value);
    }

    fn check_shape(&self, value: &str) -> bool {
        if value.is_empty() || is_shaped(value) {
            self.inline_error.borrow_mut().take();
            true
        } else {
            *self.inline_error.borrow_mut() = Some(INVALID_EMAIL.to_string());
            false
        }
    }

    pub fn focus(&self) {
        self.state.focused.set(true);
    }

    /// Leave editing; the inline error is cleared, the aggregate pass will
    /// re-raise it if the address is still malformed.
    pub fn blur(&self) {
        self.state.focused.set(false);
        self.state.touched.set(true);
        self.inline_error.borrow_mut().take();
    }

    /// The keystroke-level error, if the current buffer is malformed.
    #[must_use]
    pub fn inline_error(&self) -> Option<String> {
        self.inline_error.borrow().clone()
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.state.value()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.state.focused.get()
    }

    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.state.touched.get()
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub fn target(&self) -> Rc<InputTarget> {
        Rc::clone(&self.state.target)
    }

    /// Placeholder text, suppressed in read mode.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        if self.binding.is_read_mode() {
            None
        } else {
            self.config.placeholder.as_deref()
        }
    }
}

impl Drop for EmailField {
    fn drop(&mut self) {
        self.binding.remove_validation_handler(&self.handler);
    }
}
