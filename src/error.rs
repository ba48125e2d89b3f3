//! Error types for the event registry and controller configuration.

use alloc::string::String;

/// Conditions reported by [`EventRegistry`](crate::registry::EventRegistry).
///
/// None of them is fatal: the registry reports the condition, leaves its
/// state untouched and hands the error back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The operation named an event that is not declared.
    #[error("no such event: {0}")]
    UnknownEvent(String),

    /// The event name is already declared.
    #[error("event already declared: {0}")]
    DuplicateEvent(String),

    /// The handler is not subscribed to this event.
    #[error("handler not subscribed to event: {0}")]
    HandlerNotFound(String),

    /// The very same handler is already subscribed to this event.
    #[error("handler already subscribed to event: {0}")]
    DuplicateHandler(String),
}

/// Rejected [`ButtonConfig`](crate::config::ButtonConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("hold threshold must be greater than zero")]
    ZeroHoldThreshold,

    #[error("repeat interval must be greater than zero")]
    ZeroRepeatInterval,
}

/// Failure returned by an event handler.
///
/// Publishing reports it and moves on to the next handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
