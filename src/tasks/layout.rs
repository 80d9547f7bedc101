//! Fixed project layout the tasks operate on.

use std::path::{Path, PathBuf};

/// Backend project directory, relative to the repository root.
pub const PROJECT_DIR: &str = "server/eudai";
/// Source tree, relative to the project directory.
pub const SRC_DIR: &str = "src";
/// Test tree, relative to the project directory.
pub const TESTS_DIR: &str = "tests";
/// Documentation tree, relative to the repository root.
pub const DOCS_DIR: &str = "docs";
/// Documentation build output, relative to the documentation tree.
pub const DOCS_BUILD_DIR: &str = "_build";

/// Absolute locations of every tree a task touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Repository root.
    pub root: PathBuf,
    /// Backend project directory.
    pub project_dir: PathBuf,
    /// Backend test tree (optional on disk).
    pub tests_dir: PathBuf,
    /// Documentation tree.
    pub docs_dir: PathBuf,
    /// Documentation build output.
    pub docs_build_dir: PathBuf,
}

impl ProjectLayout {
    /// Resolves the layout under `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let project_dir = root.join(PROJECT_DIR);
        let docs_dir = root.join(DOCS_DIR);
        Self {
            root: root.to_path_buf(),
            tests_dir: project_dir.join(TESTS_DIR),
            docs_build_dir: docs_dir.join(DOCS_BUILD_DIR),
            project_dir,
            docs_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_trees_under_root() {
        let layout = ProjectLayout::new(Path::new("/repo"));
        assert_eq!(layout.project_dir, PathBuf::from("/repo/server/eudai"));
        assert_eq!(layout.tests_dir, PathBuf::from("/repo/server/eudai/tests"));
        assert_eq!(layout.docs_build_dir, PathBuf::from("/repo/docs/_build"));
        assert_eq!(layout.docs_dir, PathBuf::from("/repo/docs"));
    }
}
