//! Recording adapter for the `ProcessRunner` port.

use super::{lock, SharedRecorder};
use crate::cassette::format::Port;
use crate::ports::{CommandOutcome, Invocation, ProcessRunner};

/// Records process invocations while delegating to an inner implementation.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: SharedRecorder,
}

impl RecordingProcessRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.run(invocation);
        lock(&self.recorder).record_outcome(Port::Process, "run", invocation, &result);
        result
    }
}
