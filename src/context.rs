//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::process::LiveProcessRunner;
use crate::adapters::recording::filesystem::RecordingFileSystem;
use crate::adapters::recording::process::RecordingProcessRunner;
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingProcessRunner};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::filesystem::FileSystem;
use crate::ports::process::ProcessRunner;

/// Bundles the port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying, or caller-supplied).
pub struct ServiceContext {
    /// Filesystem used for existence probes and directory management.
    pub fs: Box<dyn FileSystem>,
    /// Runner for every external command.
    pub runner: Box<dyn ProcessRunner>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, runner: Box<dyn ProcessRunner>) -> Self {
        Self { fs, runner }
    }

    /// Creates a live context backed by the real disk and real processes.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveFileSystem), Box::new(LiveProcessRunner))
    }

    /// Creates a recording context that captures every interaction into a
    /// cassette under `dir`.
    ///
    /// The cassette is written when the returned session is finished, which
    /// requires this context to be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be prepared.
    pub fn recording_at(dir: PathBuf) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(&dir)?;
        let ctx = Self::new(
            Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.recorder),
            )),
            Box::new(RecordingProcessRunner::new(
                Box::new(LiveProcessRunner),
                Arc::clone(&session.recorder),
            )),
        );
        Ok((ctx, session))
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        Ok(Self::new(
            Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingProcessRunner::new(CassetteReplayer::new(&cassette))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::cassette::format::Interaction;
    use crate::ports::process::Invocation;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replaying_context_serves_both_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cassette.yaml");
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "fs".into(),
                    method: "exists".into(),
                    input: json!({"path": "docs"}),
                    output: json!(true),
                },
                Interaction {
                    seq: 1,
                    port: "process".into(),
                    method: "run".into(),
                    input: json!({}),
                    output: json!({"ok": {"exit_code": 7}}),
                },
            ],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert!(ctx.fs.exists(Path::new("docs")));
        let outcome = ctx
            .runner
            .run(&Invocation {
                program: "sphinx-build".into(),
                args: Vec::new(),
                cwd: PathBuf::from("docs"),
                env: BTreeMap::new(),
            })
            .unwrap();
        assert_eq!(outcome.exit_code, 7);
    }

    #[test]
    fn replaying_reports_missing_cassette() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/run.cassette.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn recording_context_writes_cassette_after_drop() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, session) = ServiceContext::recording_at(dir.path().join("rec")).unwrap();
        assert!(!ctx.fs.exists(&dir.path().join("missing")));
        drop(ctx);

        let written = session.finish().unwrap();
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("missing"));
    }
}
