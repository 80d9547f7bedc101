//! In-memory port fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eudai_tasks::config::TasksConfig;
use eudai_tasks::context::ServiceContext;
use eudai_tasks::ports::{CommandOutcome, FileSystem, Invocation, ProcessRunner};

pub const ROOT: &str = "/repo";

/// Directory tree held in memory.
#[derive(Clone, Default)]
pub struct MemoryFs {
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MemoryFs {
    pub fn with_dirs(dirs: &[&str]) -> Self {
        let fs = Self::default();
        for dir in dirs {
            fs.add(Path::new(ROOT).join(dir));
        }
        fs
    }

    pub fn add(&self, path: PathBuf) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.dirs.lock().unwrap().contains(&Path::new(ROOT).join(relative))
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.add(path.to_path_buf());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.dirs.lock().unwrap().retain(|d| !d.starts_with(path));
        Ok(())
    }
}

/// Runner that records invocations and fails those matching a needle.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    failures: Arc<Mutex<Vec<(String, i32)>>>,
}

impl ScriptedRunner {
    pub fn fail_when(&self, needle: &str, exit_code: i32) {
        self.failures.lock().unwrap().push((needle.to_string(), exit_code));
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines of everything run, excluding venv creation and installs.
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(Invocation::command_line)
            .filter(|line| !line.contains(" -m venv ") && !line.contains(" -m pip install "))
            .collect()
    }

    pub fn installs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(Invocation::command_line)
            .filter(|line| line.contains(" -m pip install "))
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.lock().unwrap().push(invocation.clone());
        let line = invocation.command_line();
        let exit_code = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map_or(0, |(_, code)| *code);
        Ok(CommandOutcome { exit_code })
    }
}

pub struct Harness {
    pub fs: MemoryFs,
    pub runner: ScriptedRunner,
    pub ctx: ServiceContext,
    pub config: TasksConfig,
}

impl Harness {
    pub fn new(dirs: &[&str]) -> Self {
        let fs = MemoryFs::with_dirs(dirs);
        let runner = ScriptedRunner::default();
        let ctx = ServiceContext::new(Box::new(fs.clone()), Box::new(runner.clone()));
        let config = TasksConfig::new(Path::new(ROOT));
        Self { fs, runner, ctx, config }
    }
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
