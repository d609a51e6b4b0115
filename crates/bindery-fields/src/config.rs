#![forbid(unsafe_code)]

//! Shared field configuration.
//!
//! Every field model is built from a [`FieldConfig`]: the binding path it
//! reads and writes (`name`), its user-facing label, the
//! required/disabled/read-only flags, and presentation hints. The config is
//! plain data; behavior lives in the field models.

use std::fmt;

/// Case transform applied to text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TextCase {
    /// Uppercase the whole value.
    Upper,
    /// Lowercase the whole value.
    Lower,
    /// Uppercase the first letter of each word.
    Capitalize,
    /// Leave the value as typed.
    #[default]
    None,
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextCase::Upper => "upper",
            TextCase::Lower => "lower",
            TextCase::Capitalize => "capitalize",
            TextCase::None => "none",
        };
        f.write_str(name)
    }
}

/// Horizontal alignment hint for rendering hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Configuration shared by every field model.
///
/// `name` doubles as the binding path; dots address nested values. A missing
/// `label` falls back to the name in user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldConfig {
    /// Binding path this field reads and writes.
    pub name: String,
    /// User-facing label; `name` substitutes when absent.
    pub label: Option<String>,
    /// Empty values fail validation.
    pub required: bool,
    /// The field rejects interaction entirely.
    pub disabled: bool,
    /// The field is visible but not editable.
    pub read_only: bool,
    /// Writes publish immediately instead of deferring.
    pub dynamic: bool,
    /// Hint text shown while the field is empty.
    pub placeholder: Option<String>,
    /// Horizontal alignment hint.
    pub align: TextAlign,
    /// Case transform for text input.
    pub text_case: TextCase,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            required: false,
            disabled: false,
            read_only: false,
            dynamic: false,
            placeholder: None,
            align: TextAlign::Left,
            text_case: TextCase::None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Make writes publish immediately.
    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn text_case(mut self, text_case: TextCase) -> Self {
        self.text_case = text_case;
        self
    }

    /// Label for user-facing messages, falling back to the path name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
