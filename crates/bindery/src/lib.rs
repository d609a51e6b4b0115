#![forbid(unsafe_code)]

//! Bindery: data binding and validation orchestration for form-shaped state.
//!
//! This crate is the facade. [`engine`] holds the core binding machinery;
//! [`fields`] (default feature) adds the ready-made field models and the
//! form and button controllers. Most users pull in the [`prelude`] and go.
//!
//! # Example
//!
//! ```
//! use bindery::prelude::*;
//! use serde_json::json;
//!
//! let binding = Binding::new();
//! let name = TextField::new(&binding, FieldConfig::new("name").label("Name").required());
//! let age = NumberField::new(&binding, FieldConfig::new("age").label("Age")).min(18);
//!
//! let form = FormController::new(&binding)
//!     .action(|data| Ok(json!({ "count": data.borrow().len() })));
//!
//! assert_eq!(
//!     form.submit(),
//!     SubmitOutcome::Invalid("Name field is required".into())
//! );
//!
//! name.input("Ada");
//! age.input("36");
//! assert_eq!(form.submit(), SubmitOutcome::Completed(Some(json!({ "count": 2 }))));
//! ```

pub use bindery_core as engine;

#[cfg(feature = "fields")]
pub use bindery_fields as fields;

pub use bindery_core::{
    Binding, DataRef, EntityData, EntityMode, EntityState, Subscription, TooltipNotifier,
    TooltipTarget, ValidationHandler, Value, WeakBinding,
};

#[cfg(feature = "fields")]
pub use bindery_fields::{
    ActionError, ButtonController, ClickOutcome, DecimalField, EmailField, ErrorReport,
    FieldConfig, FormController, InputTarget, NumberField, PasswordField, SubmitOutcome,
    TextAlign, TextCase, TextField,
};

/// Everything a typical form needs, importable in one line.
pub mod prelude {
    pub use bindery_core::{
        Binding, DeferredTooltip, EntityMode, EntityState, TooltipNotifier, TooltipTarget, Value,
        validate,
    };

    #[cfg(feature = "fields")]
    pub use bindery_fields::{
        ActionError, ButtonController, ClickOutcome, DecimalField, EmailField, ErrorReport,
        FieldConfig, FormController, NumberField, PasswordField, SubmitOutcome, TextAlign,
        TextCase, TextField,
    };
}
