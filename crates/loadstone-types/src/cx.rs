//! Cooperative cancellation context.
//!
//! A [`Cx`] is passed through effectful cursor methods (`filter`, `next`) so
//! a host can interrupt a long scan between rows. Cancellation is
//! cooperative: code observes it by calling [`Cx::checkpoint`] at yield
//! points. Pure accessors (`eof`, `column`, `rowid`) do not take a context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use loadstone_error::{LoadstoneError, Result};

/// Why a context was cancelled. Ordered by severity; once a stronger reason
/// is recorded, weaker ones are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CancelReason {
    /// The user interrupted the query (`sqlite3_interrupt` analogue).
    UserInterrupt,
    /// The host is shutting down.
    Shutdown,
}

#[derive(Debug)]
struct CxInner {
    cancel_requested: AtomicBool,
    cancel_reason: Mutex<Option<CancelReason>>,
    children: Mutex<Vec<Arc<CxInner>>>,
}

impl CxInner {
    fn new() -> Self {
        Self {
            cancel_requested: AtomicBool::new(false),
            cancel_reason: Mutex::new(None),
            children: Mutex::new(Vec::new()),
        }
    }
}

/// Propagate cancellation to a `CxInner` node and all its descendants.
///
/// Each node's lock is released before recursing into children to avoid
/// lock-ordering issues.
fn propagate_cancel(inner: &CxInner, reason: CancelReason) {
    // Fast-path flag first so checkpoint() observes it immediately.
    inner.cancel_requested.store(true, Ordering::Release);

    // Monotone reason update: the strongest reason wins.
    {
        let mut r = inner
            .cancel_reason
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match *r {
            Some(existing) if existing >= reason => {}
            _ => *r = Some(reason),
        }
    }

    let children: Vec<Arc<CxInner>> = {
        let guard = inner
            .children
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.clone()
    };
    for child in &children {
        propagate_cancel(child, reason);
    }
}

/// Cancellation context passed through all effectful operations.
///
/// Cloning shares cancellation state; [`Cx::create_child`] makes a new scope
/// that is cancelled when its parent is, but not vice versa.
#[derive(Debug, Clone)]
pub struct Cx {
    inner: Arc<CxInner>,
}

impl Default for Cx {
    fn default() -> Self {
        Self::new()
    }
}

impl Cx {
    /// Create a fresh root context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CxInner::new()),
        }
    }

    /// Create a child scope.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves
    /// the parent running.
    #[must_use]
    pub fn create_child(&self) -> Self {
        let child = Arc::new(CxInner::new());
        if self.is_cancel_requested() {
            // Parent already cancelled: the child starts cancelled.
            if let Some(reason) = self.cancel_reason() {
                propagate_cancel(&child, reason);
            }
        }
        self.inner
            .children
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Arc::clone(&child));
        Self { inner: child }
    }

    /// Whether cancellation has been requested on this context.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.inner.cancel_requested.load(Ordering::Acquire)
    }

    /// Request cancellation with the default reason (`UserInterrupt`).
    pub fn cancel(&self) {
        self.cancel_with_reason(CancelReason::UserInterrupt);
    }

    /// Request cancellation with an explicit reason.
    ///
    /// Propagates to all child scopes.
    pub fn cancel_with_reason(&self, reason: CancelReason) {
        propagate_cancel(&self.inner, reason);
    }

    /// The strongest cancellation reason set so far, if any.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        *self
            .inner
            .cancel_reason
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Check for cancellation at a yield point.
    ///
    /// Returns `Ok(())` when not cancelled, `Err(Interrupted)` otherwise.
    pub fn checkpoint(&self) -> Result<()> {
        if self.inner.cancel_requested.load(Ordering::Acquire) {
            return Err(LoadstoneError::Interrupted);
        }
        Ok(())
    }
}
