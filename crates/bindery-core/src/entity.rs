#![forbid(unsafe_code)]

//! Entity state: the shared data payload plus the access mode it is edited under.
//!
//! The engine reasons about data through [`DataRef`], a shared handle to a
//! mutable keyed tree of [`Value`]s. Identity is pointer identity: two
//! handles are "the same data" iff they point at the same allocation
//! ([`Rc::ptr_eq`]), never structural equality. This is what lets deferred
//! writes mutate in place without republishing, and what makes
//! `set_data` with an already-installed handle a no-op.
//!
//! [`EntityState`] is the published wrapper: one `DataRef` plus one
//! [`EntityMode`]. The wrapper itself is cheap to clone (an `Rc` bump and a
//! copy of the mode) and is cloned freshly for every publication so that
//! downstream observers can distinguish "same wrapper" from "new wrapper".
//!
//! # Invariants
//!
//! 1. `EntityState::empty()` always yields a brand-new allocation; two empty
//!    states are never `same_data`.
//! 2. Cloning an `EntityState` shares the payload: mutations through either
//!    clone are visible through both.
//! 3. [`EntityMode`] defaults to `Create`, the mode a torn-down binding
//!    resets to.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

/// Keyed mapping of heterogeneous values: the data blob a binding manages.
pub type EntityData = Map<String, Value>;

/// Shared, interior-mutable handle to an [`EntityData`] payload.
///
/// Equality of handles is [`Rc::ptr_eq`]; the engine never compares payloads
/// structurally when deciding whether data "changed".
pub type DataRef = Rc<RefCell<EntityData>>;

/// Allocate a fresh, empty shared payload.
#[must_use]
pub fn empty_data() -> DataRef {
    Rc::new(RefCell::new(EntityData::new()))
}

/// Wrap an owned payload in a shared handle.
#[must_use]
pub fn shared_data(data: EntityData) -> DataRef {
    Rc::new(RefCell::new(data))
}

/// Access mode the entity is presented under.
///
/// Mode drives downstream behavior (read mode disables editing surfaces);
/// the engine itself only stores and republishes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EntityMode {
    /// A new entity is being authored.
    #[default]
    Create,
    /// The entity is displayed without editing.
    Read,
    /// An existing entity is being modified.
    Edit,
}

impl EntityMode {
    /// Lowercase wire name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityMode::Create => "create",
            EntityMode::Read => "read",
            EntityMode::Edit => "edit",
        }
    }

    #[must_use]
    pub fn is_create(self) -> bool {
        self == EntityMode::Create
    }

    #[must_use]
    pub fn is_read(self) -> bool {
        self == EntityMode::Read
    }

    #[must_use]
    pub fn is_edit(self) -> bool {
        self == EntityMode::Edit
    }
}

impl fmt::Display for EntityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The published pairing of a data handle and its mode.
///
/// A binding holds exactly one `EntityState` at a time and hands clones of it
/// to subscribers. Within one wrapper the payload mutates in place; a new
/// wrapper is published only when a transition must be observable.
#[derive(Clone, Debug)]
pub struct EntityState {
    /// Shared payload. Mutated in place by deferred writes.
    pub data: DataRef,
    /// Mode the payload is presented under.
    pub mode: EntityMode,
}

impl EntityState {
    #[must_use]
    pub fn new(data: DataRef, mode: EntityMode) -> Self {
        Self { data, mode }
    }

    /// Fresh empty payload in `Create` mode, the post-teardown resting state.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(empty_data(), EntityMode::Create)
    }

    /// Whether `other` is the very same payload allocation.
    #[must_use]
    pub fn same_data(&self, other: &DataRef) -> bool {
        Rc::ptr_eq(&self.data, other)
    }
}

impl Default for EntityState {
    fn default() -> Self {
        Self::empty()
    }
}
