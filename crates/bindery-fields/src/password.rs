#![forbid(unsafe_code)]

//! Password field.
//!
//! The buffer holds the real text; [`PasswordField::display`] is what a
//! renderer shows, masked one bullet per grapheme unless revealed. Read
//! mode always masks, whatever the reveal toggle says.

use std::cell::Cell;
use std::rc::Rc;

use bindery_core::{
    Binding, KeyPath, Subscription, TooltipTarget, ValidationHandler, Value, path, validate,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::FieldConfig;
use crate::format::text_from_value;
use crate::target::InputTarget;
use crate::{InputState, REQUIRED_HINT, required_message, sync_target, write_value};

const MASK: &str = "\u{2022}";

/// A masked input bound to a path.
pub struct PasswordField {
    binding: Binding,
    config: FieldConfig,
    state: Rc<InputState>,
    show_password: Cell<bool>,
    handler: ValidationHandler,
    _watch: Subscription,
}

impl PasswordField {
    pub fn new(binding: &Binding, config: FieldConfig) -> Self {
        let state = InputState::new(text_from_value(&binding.get(&config.name)));
        sync_target(&state.target, &config, binding.mode());

        let handler = {
            let weak = binding.downgrade();
            let state = Rc::clone(&state);
            let required = config.required;
            let label = config.display_label().to_string();
            validate::handler(move || {
                if required && state.value().is_empty() {
                    if let Some(binding) = weak.upgrade() {
                        let target = Rc::clone(&state.target) as Rc<dyn TooltipTarget>;
                        binding.show_tooltip(Some(target), REQUIRED_HINT);
                    }
                    return Some(required_message(&label));
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
            show_password: Cell::new(false),
            handler,
            _watch: watch,
        }
    }

    /// Feed one edit.
    pub fn input(&self, raw: &str) {
        self.state.target.clear_validity();
        self.state.set_value(raw.to_string());
        let value = if raw.is_empty() {
            Value::Null
        } else {
            Value::from(raw)
        };
        write_value(&self.binding, &self.config, value);
    }

    /// Flip the reveal toggle. Ignored while the buffer is empty or the
    /// binding is in read mode.
    pub fn toggle_visibility(&self) {
        if self.binding.is_read_mode() || self.state.value().is_empty() {
            return;
        }
        self.show_password.set(!self.show_password.get());
    }

    /// Whether the renderer should show plaintext.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.show_password.get() && !self.binding.is_read_mode()
    }

    /// What a renderer shows: the buffer, or one bullet per grapheme.
    #[must_use]
    pub fn display(&self) -> String {
        let value = self.state.value();
        if self.is_revealed() {
            value
        } else {
            MASK.repeat(value.graphemes(true).count())
        }
    }

    pub fn focus(&self) {
        self.state.focused.set(true);
    }

    pub fn blur(&self) {
        self.state.focused.set(false);
        self.state.touched.set(true);
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

impl Drop for PasswordField {
    fn drop(&mut self) {
        self.binding.remove_validation_handler(&self.handler);
    }
}
