//! Backend settings loaded from the environment and an optional env file.
//!
//! Variable names match exactly (`APP_NAME`, not `app_name`). Values from
//! the process environment win over values from the file, and a missing
//! file is treated as empty.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Env file read by the backend when no other path is given.
pub const DEFAULT_ENV_FILE: &str = ".env.server";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The env file exists but could not be read or parsed.
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        /// Path of the env file.
        path: PathBuf,
        /// Underlying parse or I/O error.
        #[source]
        source: dotenvy::Error,
    },
}

/// Backend application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `APP_NAME`.
    pub app_name: String,
    /// `APP_VERSION`.
    pub app_version: String,
    /// `DATABASE_URL`.
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "EUDAI".to_string(),
            app_version: "1.0.0".to_string(),
            database_url: String::new(),
        }
    }
}

impl Settings {
    /// Loads settings from the process environment and `file_path`.
    ///
    /// Variables whose name or value is not UTF-8 are left out of the
    /// snapshot; none of them can be a setting.
    ///
    /// # Errors
    ///
    /// See [`load_config`].
    pub fn from_process_env(file_path: Option<&Path>) -> Result<Self, SettingsError> {
        load_config(&utf8_env(std::env::vars_os()), file_path)
    }
}

fn utf8_env<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Builds [`Settings`] from an environment snapshot and an optional env file.
///
/// Later assignments in the file override earlier ones; any variable also
/// present in `env` takes the value from `env`.
///
/// # Errors
///
/// Returns [`SettingsError::EnvFile`] if the file exists but is unreadable or malformed.
pub fn load_config(
    env: &HashMap<String, String>,
    file_path: Option<&Path>,
) -> Result<Settings, SettingsError> {
    let mut values = match file_path {
        Some(path) => read_env_file(path)?,
        None => HashMap::new(),
    };
    values.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));

    let defaults = Settings::default();
    let pick = |key: &str, default: String| values.get(key).cloned().unwrap_or(default);
    Ok(Settings {
        app_name: pick("APP_NAME", defaults.app_name),
        app_version: pick("APP_VERSION", defaults.app_version),
        database_url: pick("DATABASE_URL", defaults.database_url),
    })
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, SettingsError> {
    let to_error = |source| SettingsError::EnvFile { path: path.to_path_buf(), source };
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => return Err(to_error(err)),
    };

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(to_error)?;
        values.insert(key, value);
    }
    Ok(values)
}
