#![forbid(unsafe_code)]

//! Fixed-precision decimal field.
//!
//! Unlike [`NumberField`](crate::NumberField), the buffer takes any
//! keystroke; only the bound value is gated. Stored values are rounded to
//! the configured fraction digits on the way in, so the binding never holds
//! more precision than the field displays.

use std::cell::Cell;
use std::rc::Rc;

use bindery_core::{
    Binding, KeyPath, Subscription, TooltipTarget, ValidationHandler, Value, path, validate,
};

use crate::config::FieldConfig;
use crate::format::{decimal_from_value, format_decimal, parse_decimal, round_to_digits};
use crate::target::InputTarget;
use crate::{InputState, REQUIRED_HINT, required_message, sync_target, write_value};

const DEFAULT_FRACTION_DIGITS: u8 = 2;

/// A decimal input bound to a path.
pub struct DecimalField {
    binding: Binding,
    config: FieldConfig,
    state: Rc<InputState>,
    digits: Rc<Cell<u8>>,
    min: Rc<Cell<Option<f64>>>,
    max: Rc<Cell<Option<f64>>>,
    handler: ValidationHandler,
    _watch: Subscription,
}

impl DecimalField {
    pub fn new(binding: &Binding, config: FieldConfig) -> Self {
        let digits = Rc::new(Cell::new(DEFAULT_FRACTION_DIGITS));
        let min: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));
        let max: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));

        // Initial buffer is the formatted value without grouping, ready to
        // edit.
        let initial = decimal_from_value(&binding.get(&config.name))
            .map(|n| format_decimal(n, digits.get()).replace(',', ""))
            .unwrap_or_default();
        let state = InputState::new(initial);
        sync_target(&state.target, &config, binding.mode());

        let handler = {
            let weak = binding.downgrade();
            let state = Rc::clone(&state);
            let required = config.required;
            let label = config.display_label().to_string();
            let min = Rc::clone(&min);
            let max = Rc::clone(&max);
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
                if let Some(number) = parse_decimal(&value) {
                    if let Some(min) = min.get()
                        && number < min
                    {
                        let detail = format!("Value must be greater than or equal to {min}");
                        tooltip(&detail);
                        return Some(format!("{label}: {detail}"));
                    }
                    if let Some(max) = max.get()
                        && number > max
                    {
                        let detail = format!("Value must be less than or equal to {max}");
                        tooltip(&detail);
                        return Some(format!("{label}: {detail}"));
                    }
                }
                None
            })
        };
        binding.add_validation_handler(Rc::clone(&handler));

        let watch = {
            let state = Rc::clone(&state);
            let name = config.name.clone();
            let digits = Rc::clone(&digits);
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
                let shown = decimal_from_value(&value)
                    .map(|n| format_decimal(n, digits.get()))
                    .unwrap_or_default();
                if shown != *state.buffer.borrow() {
                    state.set_value(shown);
                }
            })
        };

        Self {
            binding: binding.clone(),
            config,
            state,
            digits,
            min,
            max,
            handler,
            _watch: watch,
        }
    }

    /// Fraction digits to round to and display. Defaults to 2.
    #[must_use]
    pub fn fraction_digits(self, digits: u8) -> Self {
        self.digits.set(digits);
        if !self.state.focused.get() {
            let shown = decimal_from_value(&self.binding.get(&self.config.name))
                .map(|n| format_decimal(n, digits).replace(',', ""))
                .unwrap_or_default();
            self.state.set_value(shown);
        }
        self
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub fn min(self, min: f64) -> Self {
        self.min.set(Some(min));
        self
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub fn max(self, max: f64) -> Self {
        self.max.set(Some(max));
        self
    }

    /// Feed one edit. The buffer always follows; the bound value gets the
    /// rounded parse, or null when the text does not parse.
    pub fn input(&self, raw: &str) {
        self.state.target.clear_validity();
        if raw.is_empty() {
            self.state.set_value(String::new());
            write_value(&self.binding, &self.config, Value::Null);
            return;
        }
        self.state.set_value(raw.to_string());
        let stored = parse_decimal(raw)
            .map(|n| round_to_digits(n, self.digits.get()))
            .map_or(Value::Null, Value::from);
        write_value(&self.binding, &self.config, stored);
    }

    pub fn focus(&self) {
        let current = self.state.value();
        if !current.is_empty() {
            self.state.set_value(current.replace(',', ""));
        }
        self.state.focused.set(true);
    }

    pub fn blur(&self) {
        self.state.focused.set(false);
        self.state.touched.set(true);
        let formatted = self.formatted_value();
        if !formatted.is_empty() {
            self.state.set_value(formatted);
        }
    }

    fn formatted_value(&self) -> String {
        decimal_from_value(&self.binding.get(&self.config.name))
            .map(|n| format_decimal(n, self.digits.get()))
            .unwrap_or_default()
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

impl Drop for DecimalField {
    fn drop(&mut self) {
        self.binding.remove_validation_handler(&self.handler);
    }
}
