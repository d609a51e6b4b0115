#![forbid(unsafe_code)]

//! Action errors and their normalized reports.
//!
//! Submit actions and click handlers fail with an [`ActionError`]. Before a
//! failure reaches a binding's error slot or a controller outcome it is
//! normalized into an [`ErrorReport`]: a best-effort human message, an
//! optional transport status, and the original error as cause.
//!
//! Message extraction follows a fixed precedence. For a
//! [`ActionError::Response`] the body is inspected first: a non-empty string
//! body is the message; otherwise an object's non-empty `message`, then
//! `msg`, member; otherwise any other non-null body renders its JSON form.
//! A response that yields nothing falls back to a `request failed with
//! status N` message. The other variants carry their message directly:
//! [`ActionError::Batch`] reports its last entry, [`ActionError::Code`] its
//! code.
//!
//! A response status of `0` normalizes to `500`.

use std::error::Error;
use std::fmt;

use bindery_core::Value;

use crate::format::text_from_value;

/// Failure raised by a submit action or click handler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// Structured failure response from a remote call: status plus body.
    Response { status: u16, body: Value },
    /// Plain failure message.
    Message(String),
    /// A batch of failures; the last entry is the one reported.
    Batch(Vec<String>),
    /// Bare fault code.
    Code(String),
}

impl ActionError {
    /// Shorthand for a message failure.
    pub fn message(text: impl Into<String>) -> Self {
        ActionError::Message(text.into())
    }

    /// Shorthand for a response failure.
    #[must_use]
    pub fn response(status: u16, body: Value) -> Self {
        ActionError::Response { status, body }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ErrorReport::from(self.clone()).summary())
    }
}

impl Error for ActionError {}

/// Normalized view of an [`ActionError`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorReport {
    /// Transport status, for response failures.
    pub status: Option<u16>,
    /// Extracted human message, when one could be derived.
    pub message: Option<String>,
    /// The original failure.
    pub cause: ActionError,
}

impl ErrorReport {
    /// The message, or a generic fallback when none could be derived.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match self.status {
            Some(status) => format!("request failed with status {status}"),
            None => "action failed".to_string(),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl From<ActionError> for ErrorReport {
    fn from(error: ActionError) -> Self {
        let (status, message) = match &error {
            ActionError::Response { status, body } => {
                let status = if *status == 0 { 500 } else { *status };
                let message = body_message(body)
                    .or_else(|| Some(format!("request failed with status {status}")));
                (Some(status), message)
            }
            ActionError::Message(text) => (None, Some(text.clone())),
            ActionError::Batch(entries) => (None, entries.last().cloned()),
            ActionError::Code(code) => (None, Some(code.clone())),
        };
        Self {
            status,
            message,
            cause: error,
        }
    }
}

/// Extract a human message from a response body, or `None` when the body
/// carries nothing usable.
fn body_message(body: &Value) -> Option<String> {
    match body {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            for key in ["message", "msg"] {
                if let Some(field) = map.get(key) {
                    let text = text_from_value(field);
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
            Some(Value::Object(map.clone()).to_string())
        }
        other => Some(other.to_string()),
    }
}
