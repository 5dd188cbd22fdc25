//! Stateful side of the results workspace: the current analysis, the durable
//! doubt list, the assistant chat, and statement submission.

pub mod chat;
pub mod context;
pub mod doubts;
pub mod error;
pub mod submission;

pub use chat::{AskOutcome, ChatSession, Rejection, RenderedMessage};
pub use context::ResultContext;
pub use doubts::{DoubtRow, DoubtStore};
pub use error::{Result, SessionError};
pub use submission::AnalysisSubmission;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

// None of the guarded values can be left half-updated by a panic, so poisoning is ignored.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(|e| e.into_inner())
}

/// Single-flight token: set while held, cleared on drop however the request ends.
pub(crate) struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub(crate) fn acquire(flag: Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(InFlight(flag))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
