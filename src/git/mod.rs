//! Repository location
//!
//! Finds the git working tree that encloses a directory, using git2 discovery
//! (the directory itself or any ancestor). Callers outside a repository may
//! opt out of the check and run against the directory as-is.

use crate::error::PipelineError;
use git2::Repository;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the hook runner will execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Enforced repository root, absent for forced non-git runs
    root: Option<PathBuf>,

    /// Directory the runner is launched in
    workdir: PathBuf,
}

impl RepoContext {
    /// Context bound to a repository working tree
    pub fn repository(root: PathBuf) -> Self {
        Self {
            workdir: root.clone(),
            root: Some(root),
        }
    }

    /// Context with no enforced root
    pub fn unbound(dir: PathBuf) -> Self {
        Self {
            root: None,
            workdir: dir,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn repo_root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_repository(&self) -> bool {
        self.root.is_some()
    }

    /// Whether the runner's own configuration file exists at the working root
    pub fn has_runner_config(&self, config_file: &str) -> bool {
        self.workdir.join(config_file).is_file()
    }
}

/// Locate the repository enclosing the current directory
pub fn locate(force_non_git: bool) -> Result<RepoContext, PipelineError> {
    let cwd = std::env::current_dir()?;
    locate_from(&cwd, force_non_git)
}

/// Locate the repository enclosing `start`
pub fn locate_from(start: &Path, force_non_git: bool) -> Result<RepoContext, PipelineError> {
    let discovered = Repository::discover(start)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf));

    match discovered {
        Some(root) => {
            debug!("Found git working tree at {}", root.display());
            Ok(RepoContext::repository(root))
        }
        None if force_non_git => {
            debug!(
                "No git repository above {}, continuing without one",
                start.display()
            );
            Ok(RepoContext::unbound(start.to_path_buf()))
        }
        None => Err(PipelineError::NotAGitRepository {
            path: start.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn canonical(path: &Path) -> PathBuf {
        path.canonicalize().unwrap()
    }

    #[test]
    fn test_locate_repository_root() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let context = locate_from(temp.path(), false).unwrap();
        assert!(context.is_repository());
        assert_eq!(canonical(context.workdir()), canonical(temp.path()));
        assert_eq!(
            canonical(context.repo_root().unwrap()),
            canonical(temp.path())
        );
    }

    #[test]
    fn test_locate_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let nested = temp.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let context = locate_from(&nested, false).unwrap();
        assert_eq!(canonical(context.workdir()), canonical(temp.path()));
    }

    #[test]
    fn test_not_a_git_repository() {
        let temp = TempDir::new().unwrap();

        let err = locate_from(temp.path(), false).unwrap_err();
        assert!(matches!(err, PipelineError::NotAGitRepository { .. }));
    }

    #[test]
    fn test_force_non_git() {
        let temp = TempDir::new().unwrap();

        let context = locate_from(temp.path(), true).unwrap();
        assert!(!context.is_repository());
        assert!(context.repo_root().is_none());
        assert_eq!(context.workdir(), temp.path());
    }

    #[test]
    fn test_locate_uses_current_directory() {
        // Jail serializes cwd changes with the other Jail-based tests
        figment::Jail::expect_with(|jail| {
            let root = jail.directory().to_path_buf();
            Repository::init(&root).map_err(|e| e.to_string())?;
            std::fs::create_dir_all(root.join("nested")).map_err(|e| e.to_string())?;
            jail.change_dir("nested")?;

            let context = locate(false).map_err(|e| e.to_string())?;
            assert!(context.is_repository());
            assert_eq!(canonical(context.workdir()), canonical(&root));
            Ok(())
        });
    }

    #[test]
    fn test_has_runner_config() {
        let temp = TempDir::new().unwrap();
        let context = RepoContext::unbound(temp.path().to_path_buf());
        assert!(!context.has_runner_config(".pre-commit-config.yaml"));

        std::fs::write(temp.path().join(".pre-commit-config.yaml"), "repos: []\n").unwrap();
        assert!(context.has_runner_config(".pre-commit-config.yaml"));
    }
}
