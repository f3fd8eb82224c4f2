//! The tagged outcome returned by every user-facing step.
//!
//! Navigation (back, quit) and recoverable mistakes travel through the same
//! channel as real answers, so the controller never needs a side path for
//! "the user pressed BACKSPACE".

use std::fmt;

/// Outcome of a prompt or a workflow handler.
///
/// Only [`ActionResult::Value`] carries a payload and only
/// [`ActionResult::Error`] carries a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<T = ()> {
    /// The user answered; here is the answer.
    Value(T),
    /// Continue with the workflow.
    Proceed,
    /// Return to the previous step.
    Back,
    /// Stop the application.
    Terminate,
    /// A recoverable, user-facing problem.
    Error(String),
}

/// Payload-free discriminant of [`ActionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Value,
    Proceed,
    Back,
    Terminate,
    Error,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Value => "value",
            ActionKind::Proceed => "proceed",
            ActionKind::Back => "back",
            ActionKind::Terminate => "terminate",
            ActionKind::Error => "error",
        };
        f.write_str(name)
    }
}

impl<T> ActionResult<T> {
    pub fn value(payload: T) -> Self {
        ActionResult::Value(payload)
    }

    pub fn proceed() -> Self {
        ActionResult::Proceed
    }

    pub fn back() -> Self {
        ActionResult::Back
    }

    pub fn terminate() -> Self {
        ActionResult::Terminate
    }

    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error(message.into())
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionResult::Value(_) => ActionKind::Value,
            ActionResult::Proceed => ActionKind::Proceed,
            ActionResult::Back => ActionKind::Back,
            ActionResult::Terminate => ActionKind::Terminate,
            ActionResult::Error(_) => ActionKind::Error,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            ActionResult::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ActionResult::Error(m) => Some(m),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            ActionResult::Value(v) => ActionResult::Value(f(v)),
            ActionResult::Proceed => ActionResult::Proceed,
            ActionResult::Back => ActionResult::Back,
            ActionResult::Terminate => ActionResult::Terminate,
            ActionResult::Error(m) => ActionResult::Error(m),
        }
    }

    /// Split the answer from the navigation signal.
    ///
    /// `Value(v)` becomes `Ok(v)`; every other outcome is returned unchanged
    /// (minus the payload type) as `Err` so a handler can pass it through.
    pub fn into_value(self) -> Result<T, ActionResult<()>> {
        match self {
            ActionResult::Value(v) => Ok(v),
            ActionResult::Proceed => Err(ActionResult::Proceed),
            ActionResult::Back => Err(ActionResult::Back),
            ActionResult::Terminate => Err(ActionResult::Terminate),
            ActionResult::Error(m) => Err(ActionResult::Error(m)),
        }
    }
}
