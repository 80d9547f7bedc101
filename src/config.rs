//! Orchestrator configuration from environment variables and CLI flags.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Interpreter used to create task environments when `EUDAI_TASKS_PYTHON` is unset.
pub const DEFAULT_PYTHON: &str = "python3";
/// Directory holding task environments when `EUDAI_TASKS_ENV_DIR` is unset.
pub const DEFAULT_ENV_DIR: &str = ".eudai-tasks";

/// Settings that shape how tasks prepare their environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksConfig {
    /// Repository root all task paths are resolved against.
    pub root: PathBuf,
    /// Interpreter used for `-m venv`.
    pub python: String,
    /// Absolute directory containing one environment per task.
    pub env_dir: PathBuf,
    /// Keep an existing task environment instead of recreating it.
    pub reuse_venv: bool,
    /// Fail, rather than warn, when a non-external program is missing from the environment.
    pub error_on_external_run: bool,
    /// Record port interactions to a cassette in this directory.
    pub record_dir: Option<PathBuf>,
    /// `PATH` of the invoking process, extended for each task environment.
    pub inherited_path: Option<String>,
}

impl TasksConfig {
    /// Defaults rooted at `root`, ignoring the environment.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            python: DEFAULT_PYTHON.to_string(),
            env_dir: root.join(DEFAULT_ENV_DIR),
            reuse_venv: false,
            error_on_external_run: false,
            record_dir: None,
            inherited_path: None,
        }
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    ///
    /// A relative `EUDAI_TASKS_ENV_DIR` is resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `EUDAI_TASKS_REUSE_VENV` is not a recognized boolean.
    pub fn from_lookup<F>(root: &Path, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(root);
        if let Some(python) = lookup("EUDAI_TASKS_PYTHON").filter(|v| !v.is_empty()) {
            config.python = python;
        }
        if let Some(dir) = lookup("EUDAI_TASKS_ENV_DIR").filter(|v| !v.is_empty()) {
            config.env_dir = root.join(dir);
        }
        if let Some(value) = lookup("EUDAI_TASKS_REUSE_VENV") {
            config.reuse_venv = parse_flag("EUDAI_TASKS_REUSE_VENV", &value)?;
        }
        config.record_dir = lookup("EUDAI_TASKS_RECORD").filter(|v| !v.is_empty()).map(PathBuf::from);
        config.inherited_path = lookup("PATH");
        Ok(config)
    }

    /// Reads configuration from the process environment.
    ///
    /// A `PATH` that is not valid UTF-8 keeps its readable entries.
    ///
    /// # Errors
    ///
    /// See [`TasksConfig::from_lookup`].
    pub fn from_env(root: &Path) -> Result<Self, String> {
        let mut config = Self::from_lookup(root, |key| std::env::var(key).ok())?;
        config.inherited_path = std::env::var_os("PATH").and_then(|path| utf8_search_path(&path));
        Ok(config)
    }
}

fn utf8_search_path(path: &OsStr) -> Option<String> {
    let entries: Vec<PathBuf> = std::env::split_paths(path)
        .filter(|entry| {
            let readable = entry.to_str().is_some();
            if !readable {
                tracing::warn!(entry = %entry.display(), "dropping non UTF-8 PATH entry");
            }
            readable
        })
        .collect();
    std::env::join_paths(entries).ok()?.into_string().ok()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid value for {key}: {other:?} (expected true or false)")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = TasksConfig::from_lookup(Path::new("/repo"), lookup_from(&[])).unwrap();
        assert_eq!(config, TasksConfig::new(Path::new("/repo")));
        assert_eq!(config.env_dir, PathBuf::from("/repo/.eudai-tasks"));
    }

    #[test]
    fn reads_overrides() {
        let config = TasksConfig::from_lookup(
            Path::new("/repo"),
            lookup_from(&[
                ("EUDAI_TASKS_PYTHON", "python3.12"),
                ("EUDAI_TASKS_ENV_DIR", "build/envs"),
                ("EUDAI_TASKS_REUSE_VENV", "yes"),
                ("EUDAI_TASKS_RECORD", "/tmp/cassettes"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .unwrap();
        assert_eq!(config.python, "python3.12");
        assert_eq!(config.env_dir, PathBuf::from("/repo/build/envs"));
        assert!(config.reuse_venv);
        assert_eq!(config.record_dir, Some(PathBuf::from("/tmp/cassettes")));
        assert_eq!(config.inherited_path.as_deref(), Some("/usr/bin"));
    }

    #[test]
    fn absolute_env_dir_is_kept() {
        let config = TasksConfig::from_lookup(
            Path::new("/repo"),
            lookup_from(&[("EUDAI_TASKS_ENV_DIR", "/var/cache/envs")]),
        )
        .unwrap();
        assert_eq!(config.env_dir, PathBuf::from("/var/cache/envs"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_keeps_readable_entries() {
        use std::os::unix::ffi::OsStrExt;

        let path = OsStr::from_bytes(b"/usr/local/bin:/opt/\xff/bin:/usr/bin");
        assert_eq!(utf8_search_path(path).as_deref(), Some("/usr/local/bin:/usr/bin"));
    }

    #[test]
    fn rejects_unrecognized_flag() {
        let err = TasksConfig::from_lookup(
            Path::new("/repo"),
            lookup_from(&[("EUDAI_TASKS_REUSE_VENV", "sometimes")]),
        )
        .unwrap_err();
        assert!(err.contains("EUDAI_TASKS_REUSE_VENV"));
    }
}
