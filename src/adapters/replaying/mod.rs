//! Replaying adapters that replay recorded interactions.

pub mod filesystem;
pub mod process;

pub use filesystem::ReplayingFileSystem;
pub use process::ReplayingProcessRunner;

/// Converts a recorded `{"err": ...}` output into an error, if present.
pub(crate) fn recorded_error(
    output: &serde_json::Value,
) -> Option<Box<dyn std::error::Error + Send + Sync>> {
    output.get("err").map(|err| err.as_str().unwrap_or("unknown error").to_string().into())
}
