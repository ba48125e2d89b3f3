//! Named-event publish/subscribe.
//!
//! An [`EventRegistry`] maps event names to ordered handler lists. Publishing
//! a name invokes its handlers synchronously, in subscription order, on the
//! publishing task.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use crate::error::{HandlerError, RegistryError};
use crate::report::{Level, NoopReporter, Reporter};

pub type HandlerResult = Result<(), HandlerError>;

/// A subscribed callable. Identity is the `Arc` allocation, so keep a clone
/// around to unsubscribe later.
pub type Handler<A> = Arc<dyn Fn(&A) -> HandlerResult + Send + Sync>;

/// Wraps a closure into a [`Handler`].
pub fn handler<A, F>(f: F) -> Handler<A>
where
    F: Fn(&A) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Event names mapped to the handlers subscribed to them.
///
/// Duplicate subscriptions of the same handler to one name are rejected with
/// [`RegistryError::DuplicateHandler`].
pub struct EventRegistry<A = ()> {
    handlers: Mutex<CriticalSectionRawMutex, RefCell<BTreeMap<String, Vec<Handler<A>>>>>,
    reporter: Arc<dyn Reporter>,
}

impl<A> EventRegistry<A> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(RefCell::new(BTreeMap::new())),
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Creates a registry with the given names already declared.
    pub fn with_events<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map = names.into_iter().map(|name| (name.into(), Vec::new())).collect();
        Self {
            handlers: Mutex::new(RefCell::new(map)),
            reporter: Arc::new(NoopReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Declares `name` with no handlers. Declaring an existing name keeps its handlers.
    pub fn declare(&self, name: &str) -> Result<(), RegistryError> {
        let added = self.handlers.lock(|handlers| {
            let mut handlers = handlers.borrow_mut();
            if handlers.contains_key(name) {
                false
            } else {
                handlers.insert(name.to_string(), Vec::new());
                true
            }
        });
        if added {
            Ok(())
        } else {
            self.fail(Level::Info, RegistryError::DuplicateEvent(name.to_string()))
        }
    }

    /// Removes `name` together with every handler subscribed to it.
    pub fn undeclare(&self, name: &str) -> Result<(), RegistryError> {
        let removed = self.handlers.lock(|handlers| handlers.borrow_mut().remove(name));
        match removed {
            Some(_) => Ok(()),
            None => self.fail(Level::Info, RegistryError::UnknownEvent(name.to_string())),
        }
    }

    pub fn subscribe(&self, name: &str, handler: Handler<A>) -> Result<(), RegistryError> {
        let outcome = self.handlers.lock(|handlers| {
            let mut handlers = handlers.borrow_mut();
            let Some(list) = handlers.get_mut(name) else {
                return Err(RegistryError::UnknownEvent(name.to_string()));
            };
            if list.iter().any(|existing| Arc::ptr_eq(existing, &handler)) {
                return Err(RegistryError::DuplicateHandler(name.to_string()));
            }
            list.push(handler);
            Ok(())
        });
        outcome.or_else(|err| self.fail(Level::Warn, err))
    }

    /// Removes the first subscription of `handler` to `name`.
    pub fn unsubscribe(&self, name: &str, handler: &Handler<A>) -> Result<(), RegistryError> {
        let outcome = self.handlers.lock(|handlers| {
            let mut handlers = handlers.borrow_mut();
            let Some(list) = handlers.get_mut(name) else {
                return Err(RegistryError::UnknownEvent(name.to_string()));
            };
            match list.iter().position(|existing| Arc::ptr_eq(existing, handler)) {
                Some(index) => {
                    list.remove(index);
                    Ok(())
                }
                None => Err(RegistryError::HandlerNotFound(name.to_string())),
            }
        });
        outcome.or_else(|err| self.fail(Level::Warn, err))
    }

    /// Invokes every handler of `name` with `args`, in subscription order.
    ///
    /// Handlers run after the registry lock is released, on a snapshot of the
    /// list taken at call time, so a handler may itself subscribe or publish.
    /// A handler returning an error is reported and the remaining handlers
    /// still run. Returns how many handlers completed successfully.
    pub fn publish(&self, name: &str, args: &A) -> Result<usize, RegistryError> {
        let snapshot = self
            .handlers
            .lock(|handlers| handlers.borrow().get(name).cloned());
        let Some(snapshot) = snapshot else {
            return self.fail(Level::Warn, RegistryError::UnknownEvent(name.to_string()));
        };

        let mut delivered = 0;
        for handler in &snapshot {
            match handler(args) {
                Ok(()) => delivered += 1,
                Err(err) => self
                    .reporter
                    .report(Level::Error, format_args!("handler for `{}` failed: {}", name, err)),
            }
        }
        Ok(delivered)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.handlers.lock(|handlers| handlers.borrow().contains_key(name))
    }

    /// Number of handlers subscribed to `name`, `None` if it is not declared.
    pub fn handler_count(&self, name: &str) -> Option<usize> {
        self.handlers
            .lock(|handlers| handlers.borrow().get(name).map(Vec::len))
    }

    /// Declared names, in lexical order.
    pub fn event_names(&self) -> Vec<String> {
        self.handlers
            .lock(|handlers| handlers.borrow().keys().cloned().collect())
    }

    fn fail<T>(&self, level: Level, err: RegistryError) -> Result<T, RegistryError> {
        self.reporter.report(level, format_args!("{}", err));
        Err(err)
    }
}

impl<A> Default for EventRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
