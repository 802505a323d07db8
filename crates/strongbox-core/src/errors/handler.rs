//! Error handlers: observers called as errors cross region boundaries.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use super::context::with_context;
use super::throw::is_unwind;

/// Observer of error propagation.
///
/// Called inline on the throwing thread with the try depth at the boundary
/// and whether the error is fatal. Handlers observe only: they must not
/// throw, and a handler that does is contained and logged.
pub trait ErrorHandler: Send + Sync {
    fn on_error(&self, try_depth: usize, fatal: bool);
}

impl<F> ErrorHandler for F
where
    F: Fn(usize, bool) + Send + Sync,
{
    fn on_error(&self, try_depth: usize, fatal: bool) {
        self(try_depth, fatal)
    }
}

/// Ordered handler list shared by every thread.
struct HandlerRegistry {
    handlers: RwLock<Vec<Arc<dyn ErrorHandler>>>,
}

impl HandlerRegistry {
    const fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    fn replace(&self, handlers: Vec<Arc<dyn ErrorHandler>>) {
        *self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = handlers;
    }

    fn snapshot(&self) -> Vec<Arc<dyn ErrorHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

static HANDLERS: HandlerRegistry = HandlerRegistry::new();

thread_local! {
    static NOTIFYING: Cell<bool> = const { Cell::new(false) };
}

/// Replace the handler list. Not additive: the previous list is dropped.
pub fn set_handlers(handlers: Vec<Arc<dyn ErrorHandler>>) {
    HANDLERS.replace(handlers);
}

/// Returns the number of registered handlers.
pub fn handler_count() -> usize {
    HANDLERS.len()
}

/// Call every handler in registration order.
///
/// The list is snapshotted first so a handler may call `set_handlers`.
/// Errors thrown from inside a handler are not reported again.
pub(crate) fn notify(try_depth: usize, fatal: bool) {
    if NOTIFYING.with(Cell::get) {
        return;
    }

    let handlers = HANDLERS.snapshot();
    if handlers.is_empty() {
        return;
    }

    let error = with_context(|ctx| ctx.error.clone());
    NOTIFYING.with(|notifying| notifying.set(true));

    for handler in &handlers {
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.on_error(try_depth, fatal)));

        if let Err(payload) = result {
            if is_unwind(payload.as_ref()) {
                // A throwing handler must not replace the error being propagated.
                with_context(|ctx| ctx.error = error.clone());
            }

            tracing::warn!(try_depth, fatal, "error handler panicked; continuing");
        }
    }

    NOTIFYING.with(|notifying| notifying.set(false));
}
