//! Recording adapters that capture interactions to cassettes.

pub mod filesystem;
pub mod process;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cassette::recorder::CassetteRecorder;

/// Recorder handle shared by every recording adapter of one run.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Locks the shared recorder. A panic in another holder leaves the log
/// append-only and still consistent, so a poisoned lock is entered anyway.
pub(crate) fn lock(recorder: &SharedRecorder) -> MutexGuard<'_, CassetteRecorder> {
    recorder.lock().unwrap_or_else(PoisonError::into_inner)
}
