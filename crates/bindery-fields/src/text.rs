#![forbid(unsafe_code)]

//! Plain text field.
//!
//! A [`TextField`] owns an edit buffer bound to one path. Keystrokes are
//! normalized before they land: empty input stores null, optional
//! whitespace stripping runs first, then the configured case transform.
//! The binding stores the normalized text, and the buffer shows it.
//!
//! # Invariants
//!
//! 1. The buffer and the bound value agree after every [`TextField::input`]
//!    call: the buffer holds the normalized text, the binding holds the
//!    same text or null when it normalized away.
//! 2. While the field is focused, published state never overwrites the
//!    buffer; once blurred, the next publish refreshes it.
//! 3. The validation handler lives exactly as long as the field.

use std::rc::Rc;

use bindery_core::{
    Binding, KeyPath, Subscription, TooltipTarget, ValidationHandler, Value, path, validate,
};

use crate::config::{FieldConfig, TextCase};
use crate::format::{apply_text_case, text_from_value};
use crate::target::InputTarget;
use crate::{InputState, REQUIRED_HINT, required_message, sync_target, write_value};

/// Normalize raw input: empty to `None`, optional whitespace strip, case
/// transform.
fn resolve_text(raw: &str, case: TextCase, no_space: bool) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let stripped: String = if no_space {
        raw.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        raw.to_string()
    };
    if stripped.is_empty() {
        return None;
    }
    Some(apply_text_case(&stripped, case))
}

/// A single-line text input bound to a path.
pub struct TextField {
    binding: Binding,
    config: FieldConfig,
    no_space: bool,
    state: Rc<InputState>,
    handler: ValidationHandler,
    _watch: Subscription,
}

impl TextField {
    pub fn new(binding: &Binding, config: FieldConfig) -> Self {
        let initial = resolve_text(&text_from_value(&binding.get(&config.name)), config.text_case, false)
            .unwrap_or_default();
        let state = InputState::new(initial);
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
            let case = config.text_case;
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
                    path::lookup(&data, KeyPath::new(&name)).cloned()
                };
                let shown = value
                    .and_then(|v| resolve_text(&text_from_value(&v), case, false))
                    .unwrap_or_default();
                if shown != *state.buffer.borrow() {
                    state.set_value(shown);
                }
            })
        };

        Self {
            binding: binding.clone(),
            config,
            no_space: false,
            state,
            handler,
            _watch: watch,
        }
    }

    /// Strip whitespace from input before it is stored.
    #[must_use]
    pub fn no_space(mut self) -> Self {
        self.no_space = true;
        self
    }

    /// Feed one edit: normalize, update the buffer, write through.
    pub fn input(&self, raw: &str) {
        self.state.target.clear_validity();
        let resolved = resolve_text(raw, self.config.text_case, self.no_space);
        self.state.set_value(resolved.clone().unwrap_or_default());
        write_value(&self.binding, &self.config, resolved.map_or(Value::Null, Value::from));
    }

    pub fn focus(&self) {
        self.state.focused.set(true);
    }

    pub fn blur(&self) {
        self.state.focused.set(false);
        self.state.touched.set(true);
    }

    /// Current buffer contents.
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

    /// The field's input target, for tooltip wiring.
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

impl Drop for TextField {
    fn drop(&mut self) {
        self.binding.remove_validation_handler(&self.handler);
    }
}
