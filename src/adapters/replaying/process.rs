//! Replaying adapter for the `ProcessRunner` port.

use std::sync::Mutex;

use super::recorded_error;
use crate::cassette::format::Port;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::process::{CommandOutcome, Invocation, ProcessRunner};

/// Replays recorded process exit statuses from a cassette.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run(
        &self,
        _invocation: &Invocation,
    ) -> Result<CommandOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction(Port::Process, "run").output
        };
        if let Some(err) = recorded_error(&output) {
            return Err(err);
        }
        let value = output.get("ok").unwrap_or(&output);
        let exit_code = value
            .get("exit_code")
            .and_then(serde_json::Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
            .ok_or_else(|| format!("process::run: recorded output has no exit code: {output}"))?;
        Ok(CommandOutcome { exit_code })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    fn invocation(program: &str) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            cwd: PathBuf::from("."),
            env: BTreeMap::new(),
        }
    }

    #[test]
    fn replaying_process_run() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "process".into(),
            method: "run".into(),
            input: json!({"program": "ruff", "args": ["check"], "cwd": ".", "env": {}}),
            output: json!({"ok": {"exit_code": 1}}),
        }]);
        let runner = ReplayingProcessRunner::new(replayer);
        let outcome = runner.run(&invocation("ruff")).unwrap();
        assert_eq!(outcome.exit_code, 1);
    }

    #[test]
    fn replaying_process_spawn_error() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "process".into(),
            method: "run".into(),
            input: json!({"program": "missing"}),
            output: json!({"err": "No such file or directory"}),
        }]);
        let runner = ReplayingProcessRunner::new(replayer);
        assert!(runner.run(&invocation("missing")).is_err());
    }

    #[test]
    fn output_without_exit_code_is_an_error() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "process".into(),
            method: "run".into(),
            input: json!({"program": "ruff"}),
            output: json!({"ok": {}}),
        }]);
        let runner = ReplayingProcessRunner::new(replayer);
        let err = runner.run(&invocation("ruff")).unwrap_err();
        assert!(err.to_string().contains("no exit code"), "{err}");
    }
}
