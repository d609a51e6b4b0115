#![forbid(unsafe_code)]

//! Integration tests: the binding facade's end-to-end contract.
//!
//! Exercises path access, deferred versus dynamic writes, validation
//! orchestration with fault containment, tooltip forwarding, and lifecycle
//! transitions through the public API only.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use bindery_core::{
    Binding, DeferredTooltip, EntityData, EntityMode, TooltipNotifier, TooltipTarget, Value,
    handler, shared_data,
};
use serde_json::json;

/// Minimal recording surface for notifier assertions.
#[derive(Default)]
struct Surface {
    disabled: Cell<bool>,
    read_only: Cell<bool>,
    validity: RefCell<Option<String>>,
    reports: Cell<u32>,
}

impl TooltipTarget for Surface {
    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }
    fn is_read_only(&self) -> bool {
        self.read_only.get()
    }
    fn set_validity(&self, message: &str) {
        *self.validity.borrow_mut() = Some(message.to_string());
    }
    fn clear_validity(&self) {
        self.validity.borrow_mut().take();
    }
    fn focus_and_report(&self) {
        self.reports.set(self.reports.get() + 1);
    }
}

// ============================================================================
// Path access
// ============================================================================

#[test]
fn nested_set_then_get_roundtrips() {
    let binding = Binding::new();
    binding.set("a.b.c", json!(42));

    assert_eq!(binding.get("a.b.c"), json!(42));
    assert_eq!(binding.get("a.b"), json!({ "c": 42 }));
    assert_eq!(binding.get("a"), json!({ "b": { "c": 42 } }));
}

#[test]
fn get_of_missing_and_empty_paths_is_null() {
    let binding = Binding::new();
    binding.set("present", json!(1));

    assert_eq!(binding.get("absent"), Value::Null);
    assert_eq!(binding.get("present.deeper"), Value::Null);
    assert_eq!(binding.get(""), Value::Null);
}

#[test]
fn set_through_scalar_revivifies_the_slot() {
    let binding = Binding::new();
    binding.set("a", json!("scalar"));
    binding.set("a.b", json!(true));

    assert_eq!(binding.get("a.b"), json!(true));
    assert_eq!(binding.get("a"), json!({ "b": true }));
}

// ============================================================================
// Deferred vs dynamic writes
// ============================================================================

#[test]
fn deferred_write_is_visible_but_unpublished() {
    let binding = Binding::new();
    let publications = Rc::new(Cell::new(0u32));
    let p = Rc::clone(&publications);
    let _sub = binding.subscribe(move |_| p.set(p.get() + 1));

    let payload = binding.data();
    binding.set("field", json!("typed"));

    // Visible through the facade and through the shared handle.
    assert_eq!(binding.get("field"), json!("typed"));
    assert_eq!(payload.borrow().get("field"), Some(&json!("typed")));

    // But nothing was published.
    assert_eq!(binding.version(), 0);
    assert_eq!(publications.get(), 0);
    assert!(Rc::ptr_eq(&payload, &binding.data()));
}

#[test]
fn dynamic_write_publishes_without_replacing_payload() {
    let binding = Binding::new();
    let payload = binding.data();
    let publications = Rc::new(Cell::new(0u32));
    let p = Rc::clone(&publications);
    let _sub = binding.subscribe(move |_| p.set(p.get() + 1));

    binding.set_dynamic("field", json!("typed"));

    assert_eq!(binding.version(), 1);
    assert_eq!(publications.get(), 1);
    assert!(Rc::ptr_eq(&payload, &binding.data()));
}

#[test]
fn interleaved_writes_count_only_dynamic_publications() {
    let binding = Binding::new();
    binding.set("a", json!(1));
    binding.set_dynamic("b", json!(2));
    binding.set("c", json!(3));
    binding.set_dynamic("d", json!(4));

    assert_eq!(binding.version(), 2);
    for (path, expected) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        assert_eq!(binding.get(path), json!(expected));
    }
}

// ============================================================================
// Validation orchestration
// ============================================================================

#[test]
fn first_failure_wins_in_registration_order() {
    let binding = Binding::new();
    let ran = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&ran);
    binding.add_validation_handler(handler(move || {
        log.borrow_mut().push("h1");
        None
    }));
    let log = Rc::clone(&ran);
    binding.add_validation_handler(handler(move || {
        log.borrow_mut().push("h2");
        Some("h2 failed".into())
    }));
    let log = Rc::clone(&ran);
    binding.add_validation_handler(handler(move || {
        log.borrow_mut().push("h3");
        Some("h3 failed".into())
    }));

    assert_eq!(binding.validate(), Some("h2 failed".to_string()));
    assert_eq!(*ran.borrow(), vec!["h1", "h2"]);
    assert_eq!(binding.error(), Some("h2 failed".to_string()));
}

#[test]
fn duplicate_registration_runs_once() {
    let binding = Binding::new();
    let runs = Rc::new(Cell::new(0u32));

    let r = Rc::clone(&runs);
    let check = handler(move || {
        r.set(r.get() + 1);
        None
    });
    binding.add_validation_handler(Rc::clone(&check));
    binding.add_validation_handler(check);

    assert_eq!(binding.validate(), None);
    assert_eq!(runs.get(), 1);
}

#[test]
fn panicking_handler_fails_the_pass_with_its_payload() {
    let binding = Binding::new();
    let tail_ran = Rc::new(Cell::new(false));

    binding.add_validation_handler(handler(|| panic!("boom")));
    let flag = Rc::clone(&tail_ran);
    binding.add_validation_handler(handler(move || {
        flag.set(true);
        None
    }));

    assert_eq!(binding.validate(), Some("boom".to_string()));
    assert!(!tail_ran.get());
    assert_eq!(binding.error(), Some("boom".to_string()));

    // The pass machinery survives the fault.
    binding.teardown();
    assert_eq!(binding.validate(), None);
    assert_eq!(binding.error(), None);
}

#[test]
fn empty_fault_text_passes_and_later_handlers_run() {
    let binding = Binding::new();
    let tail_ran = Rc::new(Cell::new(false));

    binding.add_validation_handler(handler(|| panic!("{}", "")));
    let flag = Rc::clone(&tail_ran);
    binding.add_validation_handler(handler(move || {
        flag.set(true);
        None
    }));

    assert_eq!(binding.validate(), None);
    assert!(tail_ran.get());
}

#[test]
fn validation_runs_against_current_deferred_state() {
    let binding = Binding::new();
    let weak = binding.downgrade();
    binding.add_validation_handler(handler(move || {
        let binding = weak.upgrade()?;
        if binding.get("name").is_null() {
            Some("name is required".to_string())
        } else {
            None
        }
    }));

    assert_eq!(binding.validate(), Some("name is required".to_string()));

    // A deferred write is enough; no publication needed before validating.
    binding.set("name", json!("ada"));
    assert_eq!(binding.validate(), None);
    assert_eq!(binding.error(), None);
}

#[test]
fn handler_removal_takes_effect_next_pass() {
    let binding = Binding::new();
    let check = handler(|| Some("always failing".into()));
    binding.add_validation_handler(Rc::clone(&check));

    assert_eq!(binding.validate(), Some("always failing".to_string()));
    binding.remove_validation_handler(&check);
    assert_eq!(binding.validate(), None);
}

// ============================================================================
// Mode and data lifecycle
// ============================================================================

#[test]
fn mode_transition_publishes_idempotent_repeat_does_not() {
    let binding = Binding::new();
    let modes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&modes);
    let _sub = binding.subscribe(move |state| log.borrow_mut().push(state.mode));

    binding.set_mode(EntityMode::Edit);
    binding.set_mode(EntityMode::Edit);
    binding.set_mode(EntityMode::Read);
    binding.set_mode(EntityMode::Read);

    assert_eq!(*modes.borrow(), vec![EntityMode::Edit, EntityMode::Read]);
    assert_eq!(binding.version(), 2);
}

#[test]
fn data_replacement_keeps_mode_unless_told_otherwise() {
    let binding = Binding::new();
    binding.set_mode(EntityMode::Edit);

    binding.set_data(shared_data(EntityData::new()));
    assert!(binding.is_edit_mode());

    binding.set_data_with_mode(shared_data(EntityData::new()), EntityMode::Read);
    assert!(binding.is_read_mode());
}

#[test]
fn installed_handle_is_a_noop_even_with_new_mode() {
    let binding = Binding::new();
    let installed = binding.data();
    let version = binding.version();

    binding.set_data(Rc::clone(&installed));
    binding.set_data_with_mode(installed, EntityMode::Edit);

    assert_eq!(binding.version(), version);
    assert!(binding.is_create_mode());
}

#[test]
fn refresh_notifies_with_identical_payload_handle() {
    let binding = Binding::new();
    binding.set("x", json!(9));
    let payload = binding.data();
    let seen = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&seen);
    let _sub = binding.subscribe(move |state| {
        *slot.borrow_mut() = Some(Rc::clone(&state.data));
    });

    binding.refresh();
    let republished = seen.borrow().clone().unwrap();
    assert!(Rc::ptr_eq(&payload, &republished));
    assert_eq!(republished.borrow().get("x"), Some(&json!(9)));
}

#[test]
fn teardown_resets_to_resting_state() {
    let binding = Binding::new();
    binding.set("a", json!(1));
    binding.set_mode(EntityMode::Edit);
    binding.add_validation_handler(handler(|| Some("x".into())));
    binding.set_error("stale");
    let old_payload = binding.data();

    binding.teardown();

    assert!(binding.is_create_mode());
    assert!(binding.data().borrow().is_empty());
    assert!(!Rc::ptr_eq(&old_payload, &binding.data()));
    assert_eq!(binding.validate(), None);
    assert_eq!(binding.error(), None);
}

// ============================================================================
// Tooltip forwarding
// ============================================================================

#[test]
fn failure_tooltip_marks_active_surface_and_defers_report() {
    let tooltip = Rc::new(DeferredTooltip::with_delay(Duration::ZERO));
    let binding = Binding::new().with_notifier(Rc::clone(&tooltip) as Rc<dyn TooltipNotifier>);
    let surface = Rc::new(Surface::default());

    let weak = binding.downgrade();
    let target = Rc::clone(&surface);
    binding.add_validation_handler(handler(move || {
        let binding = weak.upgrade()?;
        binding.show_tooltip(
            Some(Rc::clone(&target) as Rc<dyn TooltipTarget>),
            "Please fill out this field",
        );
        Some("field is required".to_string())
    }));

    assert_eq!(binding.validate(), Some("field is required".to_string()));
    assert_eq!(
        surface.validity.borrow().as_deref(),
        Some("Please fill out this field")
    );
    assert_eq!(surface.reports.get(), 0);

    assert_eq!(tooltip.pump(), 1);
    assert_eq!(surface.reports.get(), 1);
}

#[test]
fn disabled_surface_is_cleared_never_marked() {
    let tooltip = Rc::new(DeferredTooltip::new());
    let binding = Binding::new().with_notifier(Rc::clone(&tooltip) as Rc<dyn TooltipNotifier>);
    let surface = Rc::new(Surface::default());
    surface.disabled.set(true);
    surface.set_validity("stale mark");

    binding.show_tooltip(Some(Rc::clone(&surface) as Rc<dyn TooltipTarget>), "failure");

    assert_eq!(*surface.validity.borrow(), None);
    assert_eq!(tooltip.pending_count(), 0);
}

#[test]
fn read_only_surface_is_cleared_never_marked() {
    let tooltip = Rc::new(DeferredTooltip::new());
    let binding = Binding::new().with_notifier(Rc::clone(&tooltip) as Rc<dyn TooltipNotifier>);
    let surface = Rc::new(Surface::default());
    surface.read_only.set(true);
    surface.set_validity("stale mark");

    binding.show_tooltip(Some(Rc::clone(&surface) as Rc<dyn TooltipTarget>), "failure");

    assert_eq!(*surface.validity.borrow(), None);
    assert_eq!(tooltip.pending_count(), 0);
}

#[test]
fn without_notifier_tooltips_are_silently_dropped() {
    let binding = Binding::new();
    let surface = Rc::new(Surface::default());
    binding.show_tooltip(Some(Rc::clone(&surface) as Rc<dyn TooltipTarget>), "failure");
    assert_eq!(*surface.validity.borrow(), None);
}

// ============================================================================
// Shared payload across bindings
// ============================================================================

#[test]
fn two_bindings_over_one_payload_observe_each_other() {
    let payload = shared_data(EntityData::new());
    let a = Binding::from_shared(Rc::clone(&payload), EntityMode::Edit);
    let b = Binding::from_shared(payload, EntityMode::Read);

    a.set("shared.key", json!("from a"));
    assert_eq!(b.get("shared.key"), json!("from a"));

    // Publication counters stay independent.
    a.set_dynamic("shared.other", json!(1));
    assert_eq!(a.version(), 1);
    assert_eq!(b.version(), 0);
    assert_eq!(b.get("shared.other"), json!(1));
}
