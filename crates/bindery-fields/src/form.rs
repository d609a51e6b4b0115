#![forbid(unsafe_code)]

//! Form submit pipeline.
//!
//! A [`FormController`] wraps a [`Binding`] and drives the full submit
//! sequence: validate, run the before hook, run the action against the live
//! data handle, inspect the action result for an embedded error member, run
//! the after hook. The first stage that fails stops the pipeline and leaves
//! its message in the form's own error slot.
//!
//! # Failure modes
//!
//! | Stage          | On failure                                             |
//! |----------------|--------------------------------------------------------|
//! | validation     | [`SubmitOutcome::Invalid`], binding and form error set |
//! | before hook    | [`SubmitOutcome::Failed`], form error set              |
//! | action         | [`SubmitOutcome::Failed`], form error set              |
//! | result error   | [`SubmitOutcome::Failed`], form error set              |
//! | after hook     | [`SubmitOutcome::Failed`], form error set              |
//!
//! The action receives the binding's [`DataRef`] directly, not a snapshot,
//! so mutations it performs land in the shared payload.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{Binding, DataRef, Value};
use tracing::debug;

use crate::format::text_from_value;
use crate::report::{ActionError, ErrorReport};

/// Submit action: consumes the live data handle, produces a result payload.
pub type ActionFn = Rc<dyn Fn(&DataRef) -> Result<Value, ActionError>>;

/// Pre-submit hook, run after validation and before the action.
pub type HookFn = Rc<dyn Fn() -> Result<(), ActionError>>;

/// Post-submit hook, run with the action result after it was accepted.
pub type AfterFn = Rc<dyn Fn(Option<&Value>) -> Result<(), ActionError>>;

/// Terminal state of one submit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the message sits in the binding's and the form's
    /// error slots.
    Invalid(String),
    /// A hook, the action, or the result check failed.
    Failed(String),
    /// The pipeline ran to the end; carries the action result, if any.
    Completed(Option<Value>),
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(_))
    }
}

/// Drives the submit pipeline for one binding.
pub struct FormController {
    binding: Binding,
    action: Option<ActionFn>,
    before: Option<HookFn>,
    after: Option<AfterFn>,
    error: RefCell<Option<String>>,
    result: RefCell<Option<Value>>,
}

impl FormController {
    #[must_use]
    pub fn new(binding: &Binding) -> Self {
        Self {
            binding: binding.clone(),
            action: None,
            before: None,
            after: None,
            error: RefCell::new(None),
            result: RefCell::new(None),
        }
    }

    /// Install the submit action.
    #[must_use]
    pub fn action(
        mut self,
        action: impl Fn(&DataRef) -> Result<Value, ActionError> + 'static,
    ) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Install the pre-submit hook.
    #[must_use]
    pub fn before_submit(mut self, hook: impl Fn() -> Result<(), ActionError> + 'static) -> Self {
        self.before = Some(Rc::new(hook));
        self
    }

    /// Install the post-submit hook.
    #[must_use]
    pub fn after_submit(
        mut self,
        hook: impl Fn(Option<&Value>) -> Result<(), ActionError> + 'static,
    ) -> Self {
        self.after = Some(Rc::new(hook));
        self
    }

    /// The binding this form submits.
    #[must_use]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The form's own error message, if the last submit failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Result payload of the last completed submit.
    #[must_use]
    pub fn last_result(&self) -> Option<Value> {
        self.result.borrow().clone()
    }

    /// Run the whole submit sequence.
    pub fn submit(&self) -> SubmitOutcome {
        self.error.borrow_mut().take();

        if let Some(message) = self.binding.validate() {
            *self.error.borrow_mut() = Some(message.clone());
            debug!(%message, "submit blocked by validation");
            return SubmitOutcome::Invalid(message);
        }

        if let Some(before) = &self.before
            && let Err(error) = before()
        {
            return self.fail(error);
        }

        let mut result = None;
        if let Some(action) = &self.action {
            match action(&self.binding.data()) {
                Ok(value) => result = Some(value),
                Err(error) => return self.fail(error),
            }
        }

        if let Some(value) = &result
            && let Some(message) = result_error(value)
        {
            *self.error.borrow_mut() = Some(message.clone());
            debug!(%message, "submit result carried an error member");
            return SubmitOutcome::Failed(message);
        }

        if let Some(after) = &self.after
            && let Err(error) = after(result.as_ref())
        {
            return self.fail(error);
        }

        *self.result.borrow_mut() = result.clone();
        SubmitOutcome::Completed(result)
    }

    fn fail(&self, error: ActionError) -> SubmitOutcome {
        let message = ErrorReport::from(error).summary();
        *self.error.borrow_mut() = Some(message.clone());
        debug!(%message, "submit failed");
        SubmitOutcome::Failed(message)
    }
}

/// Extract the error message embedded in an action result, if one is there.
///
/// Results shaped like `{"error": {"message": "..."}}` or `{"error": "..."}`
/// report that message. A null or empty error member means success.
fn result_error(result: &Value) -> Option<String> {
    let error = result.get("error")?;
    if error.is_null() {
        return None;
    }
    if let Some(message) = error.get("message") {
        let text = text_from_value(message);
        if !text.is_empty() {
            return Some(text);
        }
    }
    let text = text_from_value(error);
    if text.is_empty() { None } else { Some(text) }
}
