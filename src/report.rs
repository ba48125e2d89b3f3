//! Pluggable reporting of non-fatal conditions.
//!
//! The registry and the controller never write to a global logger directly.
//! They are handed a [`Reporter`] at construction; [`NoopReporter`] is used
//! when none is given.

use core::fmt;

pub use log::Level;

/// Sink for diagnostic messages.
pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, message: fmt::Arguments<'_>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _level: Level, _message: fmt::Arguments<'_>) {}
}

/// Forwards to the [`log`] facade under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogReporter {
    target: &'static str,
}

impl LogReporter {
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new("button")
    }
}

impl Reporter for LogReporter {
    fn report(&self, level: Level, message: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", message);
    }
}
