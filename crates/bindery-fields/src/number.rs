#![forbid(unsafe_code)]

//! Integer field.
//!
//! The buffer accepts partial integer input (`-`, digit runs) without
//! losing keystrokes; anything else is refused and the bound value drops to
//! null. Blurring reformats the buffer with digit grouping, focusing
//! strips the grouping back out for editing.
//!
//! Range checks run against the buffer with grouping ignored, so a blurred
//! `1,234` is still validated as `1234`.

use std::cell::Cell;
use std::rc::Rc;

use bindery_core::{
    Binding, KeyPath, Subscription, TooltipTarget, ValidationHandler, Value, path, validate,
};

use crate::config::FieldConfig;
use crate::format::{format_int, int_from_value, is_partial_int, parse_int};
use crate::target::InputTarget;
use crate::{InputState, REQUIRED_HINT, required_message, sync_target, write_value};

fn range_message(label: &str, detail: &str) -> String {
    format!("{label}: {detail}")
}

/// An integer input bound to a path.
pub struct NumberField {
    binding: Binding,
    config: FieldConfig,
    state: Rc<InputState>,
    min: Rc<Cell<Option<i64>>>,
    max: Rc<Cell<Option<i64>>>,
    no_format: Rc<Cell<bool>>,
    handler: ValidationHandler,
    _watch: Subscription,
}

impl NumberField {
    pub fn new(binding: &Binding, config: FieldConfig) -> Self {
        let no_format = Rc::new(Cell::new(false));
        let min: Rc<Cell<Option<i64>>> = Rc::new(Cell::new(None));
        let max: Rc<Cell<Option<i64>>> = Rc::new(Cell::new(None));

        let initial = int_from_value(&binding.get(&config.name))
            .map(|n| format_int(n, no_format.get()))
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
                if let Some(number) = parse_int(&value.replace(',', "")) {
                    if let Some(min) = min.get()
                        && number < min
                    {
                        let detail = format!("Value must be greater than or equal to {min}");
                        tooltip(&detail);
                        return Some(range_message(&label, &detail));
                    }
                    if let Some(max) = max.get()
                        && number > max
                    {
                        let detail = format!("Value must be less than or equal to {max}");
                        tooltip(&detail);
                        return Some(range_message(&label, &detail));
                    }
                }
                None
            })
        };
        binding.add_validation_handler(Rc::clone(&handler));

        let watch = {
            let state = Rc::clone(&state);
            let name = config.name.clone();
            let no_format = Rc::clone(&no_format);
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
                let shown = int_from_value(&value)
                    .map(|n| format_int(n, no_format.get()))
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
            min,
            max,
            no_format,
            handler,
            _watch: watch,
        }
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub fn min(self, min: i64) -> Self {
        self.min.set(Some(min));
        self
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub fn max(self, max: i64) -> Self {
        self.max.set(Some(max));
        self
    }

    /// Render without digit grouping.
    #[must_use]
    pub fn no_format(self) -> Self {
        self.no_format.set(true);
        self.resync();
        self
    }

    /// Feed one edit.
    ///
    /// Partial input keeps the buffer; invalid characters leave the buffer
    /// untouched but still null the bound value.
    pub fn input(&self, raw: &str) {
        self.state.target.clear_validity();
        if raw.is_empty() {
            self.state.set_value(String::new());
            write_value(&self.binding, &self.config, Value::Null);
        } else if is_partial_int(raw) {
            self.state.set_value(raw.to_string());
            let value = parse_int(raw).map_or(Value::Null, Value::from);
            write_value(&self.binding, &self.config, value);
        } else {
            write_value(&self.binding, &self.config, Value::Null);
        }
    }

    /// Enter editing: grouping is stripped so the caret math stays simple.
    pub fn focus(&self) {
        let current = self.state.value();
        if !current.is_empty() {
            self.state.set_value(current.replace(',', ""));
        }
        self.state.focused.set(true);
    }

    /// Leave editing: reformat from the bound value, unless it is empty.
    pub fn blur(&self) {
        self.state.focused.set(false);
        self.state.touched.set(true);
        let formatted = self.formatted_value();
        if !formatted.is_empty() {
            self.state.set_value(formatted);
        }
    }

    fn formatted_value(&self) -> String {
        int_from_value(&self.binding.get(&self.config.name))
            .map(|n| format_int(n, self.no_format.get()))
            .unwrap_or_default()
    }

    fn resync(&self) {
        if !self.state.focused.get() {
            self.state.set_value(self.formatted_value());
        }
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

impl Drop for NumberField {
    fn drop(&mut self) {
        self.binding.remove_validation_handler(&self.handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── typing ──

    #[test]
    fn digits_store_the_parsed_integer() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("age"));

        field.input("42");
        assert_eq!(field.value(), "42");
        assert_eq!(binding.get("age"), json!(42));
    }

    #[test]
    fn empty_input_clears_the_value() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("age"));

        field.input("42");
        field.input("");
        assert_eq!(field.value(), "");
        assert_eq!(binding.get("age"), Value::Null);
    }

    #[test]
    fn lone_minus_buffers_without_a_value() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("delta"));

        field.input("-");
        assert_eq!(field.value(), "-");
        assert_eq!(binding.get("delta"), Value::Null);

        field.input("-7");
        assert_eq!(binding.get("delta"), json!(-7));
    }

    #[test]
    fn invalid_characters_keep_the_buffer_but_null_the_value() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("age"));

        field.input("41");
        field.input("41x");
        assert_eq!(field.value(), "41");
        assert_eq!(binding.get("age"), Value::Null);
    }

    // ── focus and blur formatting ──

    #[test]
    fn blur_groups_digits() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("n"));

        field.focus();
        field.input("1234567");
        field.blur();
        assert_eq!(field.value(), "1,234,567");
        assert_eq!(binding.get("n"), json!(1234567));
    }

    #[test]
    fn focus_strips_grouping() {
        let binding = Binding::new();
        binding.set("n", json!(1234));
        let field = NumberField::new(&binding, FieldConfig::new("n"));
        assert_eq!(field.value(), "1,234");

        field.focus();
        assert_eq!(field.value(), "1234");
    }

    #[test]
    fn blur_keeps_the_buffer_when_the_value_is_empty() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("n"));

        field.focus();
        field.input("-");
        field.blur();
        assert_eq!(field.value(), "-");
        assert_eq!(binding.get("n"), Value::Null);
    }

    #[test]
    fn no_format_renders_plain_digits() {
        let binding = Binding::new();
        binding.set("n", json!(1234567));
        let field = NumberField::new(&binding, FieldConfig::new("n")).no_format();
        assert_eq!(field.value(), "1234567");

        field.focus();
        field.input("7654321");
        field.blur();
        assert_eq!(field.value(), "7654321");
    }

    #[test]
    fn publish_refreshes_an_unfocused_buffer() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("n"));

        binding.set_dynamic("n", json!(9000));
        assert_eq!(field.value(), "9,000");
    }

    // ── validation ──

    #[test]
    fn required_empty_field_fails() {
        let binding = Binding::new();
        let _field = NumberField::new(&binding, FieldConfig::new("age").label("Age").required());
        assert_eq!(binding.validate().as_deref(), Some("Age field is required"));
    }

    #[test]
    fn below_minimum_reports_the_bound() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("age").label("Age")).min(18);

        field.input("17");
        assert_eq!(
            binding.validate().as_deref(),
            Some("Age: Value must be greater than or equal to 18")
        );

        field.input("18");
        assert_eq!(binding.validate(), None);
    }

    #[test]
    fn above_maximum_reports_the_bound() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("age").label("Age")).max(99);

        field.input("120");
        assert_eq!(
            binding.validate().as_deref(),
            Some("Age: Value must be less than or equal to 99")
        );
    }

    #[test]
    fn grouped_buffer_is_still_range_checked() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("n")).max(1000);

        field.focus();
        field.input("1234");
        field.blur();
        assert_eq!(field.value(), "1,234");
        assert_eq!(
            binding.validate().as_deref(),
            Some("n: Value must be less than or equal to 1000")
        );
    }

    #[test]
    fn unparseable_buffer_skips_range_checks() {
        let binding = Binding::new();
        let field = NumberField::new(&binding, FieldConfig::new("n")).min(10);

        field.input("-");
        assert_eq!(binding.validate(), None);
    }

    #[test]
    fn range_tooltip_lands_on_the_target() {
        use bindery_core::DeferredTooltip;

        let binding = Binding::new().with_notifier(Rc::new(DeferredTooltip::new()));
        let field = NumberField::new(&binding, FieldConfig::new("n").label("N")).min(5);

        field.input("3");
        binding.validate();
        assert_eq!(
            field.target().validity().as_deref(),
            Some("Value must be greater than or equal to 5")
        );
    }
}
