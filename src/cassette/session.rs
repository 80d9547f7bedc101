//! Recording session owning the shared cassette recorder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use super::recorder::CassetteRecorder;
use crate::adapters::recording::SharedRecorder;

/// Owns the recorder shared by every recording adapter of one run.
///
/// Both ports write into one cassette so the file can be handed straight to
/// `ServiceContext::replaying`.
pub struct RecordingSession {
    /// Recorder shared by the filesystem and process adapters.
    pub recorder: SharedRecorder,
    path: PathBuf,
}

impl RecordingSession {
    /// Create a session writing to `<dir>/<timestamp>.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette file already exists
    /// - The directory cannot be created
    pub fn new(dir: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = dir.join(format!("{timestamp}.cassette.yaml"));

        if path.exists() {
            return Err(format!("Cassette file already exists: {}", path.display()));
        }

        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = get_commit_hash();
        let recorder = CassetteRecorder::new(format!("eudai-tasks-{timestamp}"), commit);
        Ok(Self { recorder: Arc::new(Mutex::new(recorder)), path })
    }

    /// Path the cassette will be written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish the recorder and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapters still hold the recorder".to_string())?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let count = recorder.len();
        let path = recorder
            .write_to(&self.path)
            .map_err(|e| format!("Failed to write cassette {}: {e}", self.path.display()))?;
        tracing::debug!(interactions = count, "cassette written");
        Ok(path)
    }
}

/// Get the current git commit hash, or "unknown" with a warning if unavailable.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    if let Some(h) = hash {
        h
    } else {
        tracing::warn!("could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    }
}
