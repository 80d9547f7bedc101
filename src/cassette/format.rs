//! Cassette data structures for recording and replaying interactions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Port an interaction went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// The filesystem probe.
    Fs,
    /// The process runner.
    Process,
}

impl Port {
    /// Name stored in the cassette's `port` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fs => "fs",
            Self::Process => "process",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name, as written by [`Port::as_str`].
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit hash at recording time.
    pub commit: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_keeps_nested_invocation_payloads() {
        let cassette = Cassette {
            name: "lint-run".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "fs".into(),
                    method: "exists".into(),
                    input: json!({"path": "server/eudai"}),
                    output: json!(true),
                },
                Interaction {
                    seq: 1,
                    port: "process".into(),
                    method: "run".into(),
                    input: json!({
                        "program": "ruff",
                        "args": ["format", "src", "tests"],
                        "cwd": "server/eudai",
                        "env": {"VIRTUAL_ENV": ".eudai-tasks/lint"}
                    }),
                    output: json!({"ok": {"exit_code": 0}}),
                },
            ],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let parsed: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(parsed.interactions[1].input["args"][0], "format");
        assert_eq!(parsed.interactions[1].input["env"]["VIRTUAL_ENV"], ".eudai-tasks/lint");
        assert_eq!(parsed, cassette);
    }
}
