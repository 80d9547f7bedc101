//! Recording adapter for the `FileSystem` port.

use std::path::Path;

use serde::Serialize;

use super::{lock, SharedRecorder};
use crate::cassette::format::Port;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: SharedRecorder,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a Path,
}

impl FileSystem for RecordingFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        lock(&self.recorder).record(Port::Fs, "exists", &PathInput { path }, &result);
        result
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.create_dir_all(path);
        lock(&self.recorder).record_outcome(Port::Fs, "create_dir_all", &PathInput { path }, &result);
        result
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.remove_dir_all(path);
        lock(&self.recorder).record_outcome(Port::Fs, "remove_dir_all", &PathInput { path }, &result);
        result
    }
}
