//! Try regions: a body, ordered catch clauses, and an optional finally.
//!
//! Each `Region::run` is one dispatch point. The body, the selected catch and
//! the finally each run under `catch_unwind`; the frame's phase records which
//! one is active. Errors resolve innermost-first:
//!
//! 1. the first clause matching the active error runs,
//! 2. finally runs exactly once, whether or not a clause matched,
//! 3. an error still pending afterwards (unmatched, or raised by the catch or
//!    finally) pops the frame, is reported to the handlers at the enclosing
//!    depth, and moves to the enclosing region.
//!
//! Panics that are not engine throws are never caught. They still run the
//! finally and pop the frame, then keep unwinding.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe, Location};

use super::active::{ActiveError, ErrorLocation};
use super::context::with_context;
use super::registry::ASSERT_ERROR;
use super::throw::{self, is_unwind};
use super::try_stack::{RegionId, TryPhase};
use super::types::ErrorType;
use crate::constants;

/// What a catch clause accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchClause {
    /// The type or any of its descendants, when not fatal.
    Exact(&'static ErrorType),
    /// Every error that is not fatal.
    Any,
    /// Only fatal errors.
    Fatal,
}

impl CatchClause {
    pub fn matches(&self, error: &ActiveError) -> bool {
        match self {
            Self::Exact(error_type) => !error.is_fatal() && error.is_a(error_type),
            Self::Any => !error.is_fatal(),
            Self::Fatal => error.is_fatal(),
        }
    }
}

type CatchBody<'a, T> = Box<dyn FnOnce(&ActiveError) -> T + 'a>;

/// A try region under construction. Nothing runs until [`Region::run`].
#[must_use = "a region does nothing until `run` is called"]
pub struct Region<'a, T> {
    body: Box<dyn FnOnce() -> T + 'a>,
    catches: Vec<(CatchClause, CatchBody<'a, T>)>,
    finally: Option<Box<dyn FnOnce() + 'a>>,
}

/// Start a region around `body`.
pub fn region<'a, T>(body: impl FnOnce() -> T + 'a) -> Region<'a, T> {
    Region::new(body)
}

/// Run `body`, turning any non-fatal error into `Err`.
///
/// Fatal errors keep propagating.
#[track_caller]
pub fn attempt<'a, T>(body: impl FnOnce() -> T + 'a) -> Result<T, ActiveError> {
    Region::new(move || Ok(body()))
        .catch_any(|error| Err(error.clone()))
        .run()
}

enum Outcome<T> {
    Value(T),
    Thrown,
    Panicked(Box<dyn Any + Send>),
}

impl<T> Outcome<T> {
    fn from_result(result: std::thread::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(payload) if is_unwind(payload.as_ref()) => Self::Thrown,
            Err(payload) => Self::Panicked(payload),
        }
    }
}

impl<'a, T> Region<'a, T> {
    pub fn new(body: impl FnOnce() -> T + 'a) -> Self {
        Self {
            body: Box::new(body),
            catches: Vec::new(),
            finally: None,
        }
    }

    /// Catch `error_type` and its descendants.
    pub fn catch(
        self,
        error_type: &'static ErrorType,
        handler: impl FnOnce(&ActiveError) -> T + 'a,
    ) -> Self {
        self.catch_clause(CatchClause::Exact(error_type), handler)
    }

    /// Catch every non-fatal error.
    pub fn catch_any(self, handler: impl FnOnce(&ActiveError) -> T + 'a) -> Self {
        self.catch_clause(CatchClause::Any, handler)
    }

    /// Catch fatal errors only.
    pub fn catch_fatal(self, handler: impl FnOnce(&ActiveError) -> T + 'a) -> Self {
        self.catch_clause(CatchClause::Fatal, handler)
    }

    /// Append a clause. Clauses are tried in the order they were added.
    pub fn catch_clause(
        mut self,
        clause: CatchClause,
        handler: impl FnOnce(&ActiveError) -> T + 'a,
    ) -> Self {
        self.catches.push((clause, Box::new(handler)));
        self
    }

    /// Set the finally block, replacing any previous one.
    pub fn finally(mut self, finally: impl FnOnce() + 'a) -> Self {
        self.finally = Some(Box::new(finally));
        self
    }

    /// Run the region.
    ///
    /// Returns the value of the body, or of the catch that handled the error.
    /// An error no clause handles continues to the enclosing region once the
    /// finally has run.
    #[track_caller]
    pub fn run(self) -> T {
        let region = enter(Location::caller());
        let Self {
            body,
            catches,
            finally,
        } = self;

        set_phase(region, TryPhase::Body);
        let mut outcome = Outcome::from_result(panic::catch_unwind(AssertUnwindSafe(body)));

        if let Outcome::Thrown = outcome {
            if let Some((error, handler)) = select_catch(catches) {
                set_phase(region, TryPhase::Catch);
                outcome = Outcome::from_result(panic::catch_unwind(AssertUnwindSafe(|| {
                    handler(&error)
                })));
            }
        }

        if let Some(finally) = finally {
            set_phase(region, TryPhase::Finally);

            match panic::catch_unwind(AssertUnwindSafe(finally)) {
                Ok(()) => {}
                Err(payload) if is_unwind(payload.as_ref()) => outcome = Outcome::Thrown,
                Err(payload) => outcome = Outcome::Panicked(payload),
            }
        }

        leave(region, outcome)
    }
}

/// Push a frame, or raise the fatal overflow error when the stack is full.
fn enter(caller: &'static Location<'static>) -> RegionId {
    let pushed = with_context(|ctx| {
        ctx.stack
            .push()
            .map(|region| (region, ctx.stack.depth()))
    });

    match pushed {
        Ok((region, depth)) => {
            tracing::trace!(depth, "try region entered");
            region
        }
        Err(full) => {
            tracing::warn!(max = full.max, "try stack overflow");
            throw::raise(
                &ASSERT_ERROR,
                true,
                ErrorLocation::from(caller),
                constants::TRY_OVERFLOW_MESSAGE,
                None,
            )
        }
    }
}

fn set_phase(region: RegionId, phase: TryPhase) {
    with_context(|ctx| ctx.stack.set_phase(region, phase));
}

fn select_catch<'a, T>(
    catches: Vec<(CatchClause, CatchBody<'a, T>)>,
) -> Option<(ActiveError, CatchBody<'a, T>)> {
    let error = with_context(|ctx| ctx.error.clone())?;
    let (_, handler) = catches
        .into_iter()
        .find(|(clause, _)| clause.matches(&error))?;

    Some((error, handler))
}

fn leave<T>(region: RegionId, outcome: Outcome<T>) -> T {
    match outcome {
        Outcome::Value(value) => {
            close(region);
            value
        }
        Outcome::Thrown => {
            let (remaining, fatal) = with_context(|ctx| {
                ctx.stack.pop(region);
                (ctx.stack.depth(), ctx.is_fatal())
            });
            tracing::trace!(remaining, "error left try region");

            throw::propagate(remaining, fatal)
        }
        Outcome::Panicked(payload) => {
            close(region);
            panic::resume_unwind(payload)
        }
    }
}

/// Pop the frame; the active error is cleared once no region is open.
fn close(region: RegionId) {
    let depth = with_context(|ctx| {
        ctx.stack.pop(region);
        if ctx.stack.is_empty() {
            ctx.error = None;
        }
        ctx.stack.depth()
    });

    tracing::trace!(depth, "try region closed");
}
