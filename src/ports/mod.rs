//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the orchestrator core and an
//! external system (the filesystem and spawned processes).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod process;

pub use filesystem::FileSystem;
pub use process::{CommandOutcome, Invocation, ProcessRunner};
