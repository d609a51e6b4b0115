#![forbid(unsafe_code)]

//! Core data-binding engine: path-addressed state, change notification, and
//! validation orchestration.
//!
//! The engine is UI-agnostic. It owns a shared tree of heterogeneous values
//! ([`EntityData`]), addressed by dotted paths, wrapped together with an
//! access mode ([`EntityMode`]) into a published [`EntityState`]. The
//! [`Binding`] facade is the one handle callers hold: reads, deferred and
//! publishing writes, mode and payload transitions, validator registration,
//! and a shared error slot all go through it.
//!
//! # Architecture
//!
//! - [`path`]: dotted-path lookup and auto-vivifying store over the data
//!   tree. Pure functions, no sharing.
//! - [`entity`]: the shared payload handle ([`DataRef`]) and the published
//!   wrapper. Identity is pointer identity.
//! - [`notify`]: weak subscriber callbacks behind an RAII [`Subscription`]
//!   guard, notified in registration order.
//! - [`validate`]: the insertion-ordered, identity-deduplicated
//!   [`ValidatorRegistry`]; handlers run behind an unwind boundary and the
//!   first non-empty message wins.
//! - [`tooltip`]: the [`TooltipNotifier`] collaborator contract plus the
//!   standard [`DeferredTooltip`] implementation.
//! - [`binding`]: the facade over all of the above.
//!
//! Everything is single-threaded (`Rc`/`RefCell`); a binding and its
//! collaborators live on one thread.
//!
//! # Example
//!
//! ```
//! use bindery_core::{Binding, EntityMode, validate};
//! use serde_json::json;
//!
//! let binding = Binding::new();
//! binding.set("customer.name", json!("Ada"));
//! assert_eq!(binding.get("customer.name"), json!("Ada"));
//!
//! // Validators pull state back out of the binding through a weak handle.
//! let weak = binding.downgrade();
//! binding.add_validation_handler(validate::handler(move || {
//!     let binding = weak.upgrade()?;
//!     if binding.get("customer.email").is_null() {
//!         Some("email is required".to_string())
//!     } else {
//!         None
//!     }
//! }));
//!
//! assert_eq!(binding.validate(), Some("email is required".to_string()));
//! binding.set("customer.email", json!("ada@example.com"));
//! assert_eq!(binding.validate(), None);
//!
//! binding.set_mode(EntityMode::Read);
//! assert!(binding.is_read_mode());
//! ```

pub mod binding;
pub mod entity;
pub mod notify;
pub mod path;
pub mod tooltip;
pub mod validate;

pub use binding::{Binding, WeakBinding};
pub use entity::{DataRef, EntityData, EntityMode, EntityState, empty_data, shared_data};
pub use notify::Subscription;
pub use path::{KeyPath, lookup, store};
pub use tooltip::{DEFAULT_REPORT_DELAY, DeferredTooltip, TooltipNotifier, TooltipTarget};
pub use validate::{ValidationHandler, ValidatorRegistry, handler, invoke_isolated};

/// Re-exported value type: the engine stores [`serde_json::Value`] trees.
pub use serde_json::Value;
