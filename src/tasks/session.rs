//! Per-invocation execution context and step executor.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::TaskError;
use super::plan::{CommandSpec, Plan, Step};
use super::registry::TaskKind;
use super::requirement::Requirement;
use super::TaskOutcome;
use crate::config::TasksConfig;
use crate::context::ServiceContext;
use crate::ports::process::Invocation;

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const PATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const PATH_SEPARATOR: &str = ":";

/// Isolated tool environment owned by one task.
#[derive(Debug, Clone)]
struct VirtualEnv {
    location: PathBuf,
    ready: bool,
}

impl VirtualEnv {
    fn bin_dir(&self) -> PathBuf {
        self.location.join(BIN_DIR)
    }
}

/// Execution context of a single task invocation.
///
/// Holds the working directory and environment overrides for one task. Nothing here touches the process-wide working
/// directory or environment, so two sessions in the same process never
/// observe each other.
pub struct Session<'a> {
    ctx: &'a ServiceContext,
    config: &'a TasksConfig,
    task: TaskKind,
    cwd: PathBuf,
    env: BTreeMap<String, String>,
    venv: VirtualEnv,
}

impl<'a> Session<'a> {
    /// Creates a fresh session for `task`, starting at the repository root.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a TasksConfig, task: TaskKind) -> Self {
        Self {
            ctx,
            config,
            task,
            cwd: config.root.clone(),
            env: BTreeMap::new(),
            venv: VirtualEnv { location: config.env_dir.join(task.name()), ready: false },
        }
    }

    /// Current working directory of the session.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Environment overrides set so far.
    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Location of the task environment.
    #[must_use]
    pub fn venv_location(&self) -> &Path {
        &self.venv.location
    }

    /// Executes the plan's steps in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that fails; later steps do not run.
    pub fn execute(&mut self, plan: &Plan) -> Result<TaskOutcome, TaskError> {
        for step in &plan.steps {
            match step {
                Step::Chdir(dir) => self.chdir(dir)?,
                Step::Install(requirements) => self.install(requirements)?,
                Step::SetEnv { key, value } => {
                    debug!(task = %self.task, %key, %value, "setting environment variable");
                    self.env.insert(key.clone(), value.clone());
                }
                Step::CreateDir(dir) => self.create_dir(dir)?,
                Step::Run(command) => self.run(command)?,
                Step::Skip(reason) => {
                    info!(task = %self.task, "{reason}");
                    return Ok(TaskOutcome::Skipped { reason: reason.clone() });
                }
            }
        }

        if let Some(artifact) = &plan.artifact {
            if self.ctx.fs.exists(artifact) {
                info!(task = %self.task, artifact = %artifact.display(), "artifact written");
            }
        }
        Ok(TaskOutcome::Succeeded)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    fn chdir(&mut self, dir: &Path) -> Result<(), TaskError> {
        let target = self.resolve(dir);
        if !self.ctx.fs.exists(&target) {
            return Err(TaskError::MissingDirectory {
                path: target.display().to_string(),
                message: format!("cannot change into {}: directory does not exist", target.display()),
            });
        }
        info!(task = %self.task, "cd {}", target.display());
        self.cwd = target;
        Ok(())
    }

    fn create_dir(&self, dir: &Path) -> Result<(), TaskError> {
        let target = self.resolve(dir);
        debug!(task = %self.task, path = %target.display(), "creating directory");
        self.ctx.fs.create_dir_all(&target).map_err(|e| TaskError::Filesystem {
            path: target.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Creates the task environment the first time a command needs it.
    fn ensure_venv(&mut self) -> Result<(), TaskError> {
        if self.venv.ready {
            return Ok(());
        }
        let location = self.venv.location.clone();
        if self.ctx.fs.exists(&location) {
            if self.config.reuse_venv {
                info!(task = %self.task, "re-using existing virtual environment at {}", location.display());
                self.venv.ready = true;
                return Ok(());
            }
            self.ctx.fs.remove_dir_all(&location).map_err(|e| TaskError::Filesystem {
                path: location.display().to_string(),
                message: e.to_string(),
            })?;
        }

        info!(task = %self.task, "creating virtual environment at {}", location.display());
        let invocation = Invocation {
            program: self.config.python.clone(),
            args: vec!["-m".into(), "venv".into(), location.display().to_string()],
            cwd: self.config.root.clone(),
            env: BTreeMap::new(),
        };
        self.spawn(&invocation)?;
        self.venv.ready = true;
        Ok(())
    }

    /// Environment for a command: task overrides plus the venv activation.
    fn command_env(&self) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        let bin = self.venv.bin_dir().display().to_string();
        let path = match self.config.inherited_path.as_deref() {
            Some(inherited) if !inherited.is_empty() => format!("{bin}{PATH_SEPARATOR}{inherited}"),
            _ => bin,
        };
        env.insert("PATH".into(), path);
        env.insert("VIRTUAL_ENV".into(), self.venv.location.display().to_string());
        env
    }

    fn install(&mut self, requirements: &[Requirement]) -> Result<(), TaskError> {
        if requirements.is_empty() {
            return Ok(());
        }
        self.ensure_venv()?;
        let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
        args.extend(requirements.iter().map(ToString::to_string));
        let invocation = Invocation {
            program: self.venv.bin_dir().join("python").display().to_string(),
            args,
            cwd: self.cwd.clone(),
            env: self.command_env(),
        };
        info!(task = %self.task, "pip install {}", invocation.args[3..].join(" "));
        self.spawn(&invocation)
    }

    fn run(&mut self, command: &CommandSpec) -> Result<(), TaskError> {
        self.ensure_venv()?;
        if !command.external && !command.program.contains(['/', '\\']) {
            let in_env = self.venv.bin_dir().join(&command.program);
            if !self.ctx.fs.exists(&in_env) {
                if self.config.error_on_external_run {
                    return Err(TaskError::NotInEnvironment { program: command.program.clone() });
                }
                warn!(
                    task = %self.task,
                    program = %command.program,
                    "program is not installed in the task environment; pass it as external to silence this"
                );
            }
        }

        let invocation = Invocation {
            program: command.program.clone(),
            args: command.args.clone(),
            cwd: self.cwd.clone(),
            env: self.command_env(),
        };
        info!(task = %self.task, "{}", invocation.command_line());
        self.spawn(&invocation)
    }

    fn spawn(&self, invocation: &Invocation) -> Result<(), TaskError> {
        debug!(task = %self.task, cwd = %invocation.cwd.display(), "spawning {invocation}");
        let outcome = self.ctx.runner.run(invocation).map_err(|e| TaskError::Spawn {
            command: invocation.command_line(),
            message: e.to_string(),
        })?;
        if outcome.success() {
            Ok(())
        } else {
            Err(TaskError::ToolFailed {
                command: invocation.command_line(),
                exit_code: outcome.exit_code,
            })
        }
    }
}
