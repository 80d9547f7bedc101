//! Collects port interactions and writes them out as one cassette.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::format::{Cassette, Interaction, Port};

/// In-memory log of every port call made during one recording run.
///
/// Sequence numbers follow insertion order across both ports, so the
/// written cassette reads as a timeline of the run.
#[derive(Debug)]
pub struct CassetteRecorder {
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Starts an empty recording named `name`, taken at `commit`.
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self { name: name.into(), commit: commit.into(), interactions: Vec::new() }
    }

    /// Number of interactions captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Captures a call whose answer is a plain value, such as `fs::exists`.
    pub fn record<I, O>(&mut self, port: Port, method: &str, input: &I, output: &O)
    where
        I: Serialize + ?Sized,
        O: Serialize + ?Sized,
    {
        let output = to_json(output);
        self.push(port, method, to_json(input), output);
    }

    /// Captures a fallible call as `{"ok": value}` or `{"err": message}`.
    pub fn record_outcome<I, T, E>(
        &mut self,
        port: Port,
        method: &str,
        input: &I,
        result: &Result<T, E>,
    ) where
        I: Serialize + ?Sized,
        T: Serialize,
        E: Display,
    {
        let output = match result {
            Ok(value) => json!({ "ok": to_json(value) }),
            Err(err) => json!({ "err": err.to_string() }),
        };
        self.push(port, method, to_json(input), output);
    }

    fn push(&mut self, port: Port, method: &str, input: Value, output: Value) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.as_str().to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Seals the recording into a cassette stamped with the current time.
    #[must_use]
    pub fn into_cassette(self) -> Cassette {
        Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        }
    }

    /// Seals the recording and writes it to `path` as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn write_to(self, path: &Path) -> Result<PathBuf, std::io::Error> {
        let yaml = serde_yaml::to_string(&self.into_cassette()).map_err(std::io::Error::other)?;
        std::fs::write(path, yaml)?;
        Ok(path.to_path_buf())
    }
}

/// Payloads that cannot be represented (a non UTF-8 path, say) are kept as a
/// marker string so the interaction still occupies its slot on replay.
fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "interaction payload is not representable in a cassette");
        Value::String(format!("<unrecordable: {err}>"))
    })
}
