//! End-to-end submit flows: fields, form controller, and button controller
//! working against one shared binding.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{Binding, Value};
use bindery_fields::{
    ActionError, ButtonController, ClickOutcome, EmailField, FieldConfig, FormController,
    NumberField, SubmitOutcome, TextField,
};
use serde_json::json;

// ============================================================
// Form pipeline
// ============================================================

#[test]
fn filled_form_submits_its_data() {
    let binding = Binding::new();
    let name = TextField::new(&binding, FieldConfig::new("name").label("Name").required());
    let age = NumberField::new(&binding, FieldConfig::new("age").label("Age").required());

    name.input("Ada");
    age.input("36");

    let form = FormController::new(&binding).action(|data| {
        let snapshot = Value::Object(data.borrow().clone());
        Ok(json!({ "saved": snapshot }))
    });

    let outcome = form.submit();
    assert_eq!(
        outcome,
        SubmitOutcome::Completed(Some(json!({ "saved": { "name": "Ada", "age": 36 } })))
    );
    assert_eq!(form.error(), None);
    assert_eq!(binding.error(), None);
}

#[test]
fn first_empty_required_field_blocks_the_submit() {
    let binding = Binding::new();
    let _name = TextField::new(&binding, FieldConfig::new("name").label("Name").required());
    let _age = NumberField::new(&binding, FieldConfig::new("age").label("Age").required());

    let ran = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ran);
    let form = FormController::new(&binding).action(move |_| {
        *flag.borrow_mut() = true;
        Ok(Value::Null)
    });

    let outcome = form.submit();
    assert_eq!(outcome, SubmitOutcome::Invalid("Name field is required".into()));
    assert!(!*ran.borrow());
    assert_eq!(binding.error().as_deref(), Some("Name field is required"));
    // The form mirrors the validation message in its own slot.
    assert_eq!(form.error().as_deref(), Some("Name field is required"));
}

#[test]
fn hooks_run_in_pipeline_order() {
    let binding = Binding::new();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let before_log = Rc::clone(&log);
    let action_log = Rc::clone(&log);
    let after_log = Rc::clone(&log);
    let form = FormController::new(&binding)
        .before_submit(move || {
            before_log.borrow_mut().push("before");
            Ok(())
        })
        .action(move |_| {
            action_log.borrow_mut().push("action");
            Ok(json!({ "ok": true }))
        })
        .after_submit(move |result| {
            after_log.borrow_mut().push("after");
            assert_eq!(result, Some(&json!({ "ok": true })));
            Ok(())
        });

    assert!(form.submit().is_completed());
    assert_eq!(*log.borrow(), vec!["before", "action", "after"]);
}

#[test]
fn action_writes_flow_back_into_field_buffers() {
    let binding = Binding::new();
    let name = TextField::new(&binding, FieldConfig::new("name"));
    name.input("draft");

    let form = FormController::new(&binding).action(|data| {
        data.borrow_mut().insert("name".into(), json!("saved"));
        Ok(Value::Null)
    });

    assert!(form.submit().is_completed());
    // The action wrote through the shared handle; one refresh publishes it.
    assert_eq!(binding.get("name"), json!("saved"));
    binding.refresh();
    assert_eq!(name.value(), "saved");
}

#[test]
fn result_error_member_stays_on_the_form() {
    let binding = Binding::new();
    let _name = TextField::new(&binding, FieldConfig::new("name"));

    let form = FormController::new(&binding)
        .action(|_| Ok(json!({ "error": { "message": "name already taken" } })));

    assert_eq!(form.submit(), SubmitOutcome::Failed("name already taken".into()));
    assert_eq!(form.error().as_deref(), Some("name already taken"));
    assert_eq!(binding.error(), None);
}

#[test]
fn response_error_falls_back_to_status_text() {
    let binding = Binding::new();
    let form = FormController::new(&binding)
        .action(|_| Err(ActionError::response(503, Value::Null)));

    assert_eq!(
        form.submit(),
        SubmitOutcome::Failed("request failed with status 503".into())
    );
}

// ============================================================
// Button pipeline
// ============================================================

#[test]
fn button_gate_blocks_until_fields_are_filled() {
    let binding = Binding::new();
    let email = EmailField::new(&binding, FieldConfig::new("email").label("Email").required());

    let clicks = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&clicks);
    let button = ButtonController::for_binding(&binding).on_click(move || {
        *counter.borrow_mut() += 1;
        Ok(None)
    });

    assert_eq!(
        button.click(),
        ClickOutcome::Invalid("Email field is required".into())
    );
    assert_eq!(*clicks.borrow(), 0);

    email.input("ada@example.com");
    assert_eq!(button.click(), ClickOutcome::Completed(None));
    assert_eq!(*clicks.borrow(), 1);
}

#[test]
fn malformed_email_blocks_a_gated_click() {
    let binding = Binding::new();
    let email = EmailField::new(&binding, FieldConfig::new("email").label("Email"));
    let button = ButtonController::for_binding(&binding).on_click(|| Ok(None));

    email.input("not-an-address");
    assert_eq!(
        button.click(),
        ClickOutcome::Invalid("Email: Must contain a valid email address".into())
    );
}

#[test]
fn handler_failure_stays_on_the_binding_past_a_clean_click() {
    let binding = Binding::new();
    let attempts = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&attempts);
    let button = ButtonController::for_binding(&binding)
        .immediate()
        .on_click(move || {
            *counter.borrow_mut() += 1;
            if *counter.borrow() == 1 {
                Err(ActionError::response(409, json!({ "message": "already exists" })))
            } else {
                Ok(Some(json!("created")))
            }
        });

    assert_eq!(button.click(), ClickOutcome::Failed("already exists".into()));
    assert_eq!(binding.error().as_deref(), Some("already exists"));

    // An immediate click never touches the slot; a passing validation does.
    assert_eq!(button.click(), ClickOutcome::Completed(Some(json!("created"))));
    assert_eq!(binding.error().as_deref(), Some("already exists"));
    binding.validate();
    assert_eq!(binding.error(), None);
}

#[test]
fn immediate_button_ignores_an_invalid_form() {
    let binding = Binding::new();
    let _name = TextField::new(&binding, FieldConfig::new("name").label("Name").required());
    let button = ButtonController::for_binding(&binding)
        .immediate()
        .on_click(|| Ok(None));

    assert_eq!(button.click(), ClickOutcome::Completed(None));
}

#[test]
fn form_and_button_share_the_binding_error_slot() {
    let binding = Binding::new();
    let name = TextField::new(&binding, FieldConfig::new("name").label("Name").required());

    // A failed gated click leaves the validation message on the binding.
    let button = ButtonController::for_binding(&binding).on_click(|| Ok(None));
    assert_eq!(
        button.click(),
        ClickOutcome::Invalid("Name field is required".into())
    );
    assert_eq!(binding.error().as_deref(), Some("Name field is required"));

    // Fixing the field and re-running validation clears it.
    name.input("Ada");
    let form = FormController::new(&binding).action(|_| Ok(Value::Null));
    assert!(form.submit().is_completed());
    assert_eq!(binding.error(), None);
}
