//! Python virtualenv handling.

use std::path::{Path, PathBuf};

use mvlc_docs_tools::{Invocation, ToolRunner};

use crate::provisioner::ProvisionError;

/// An isolated Python environment rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    dir: PathBuf,
}

impl VirtualEnv {
    /// Describe the virtualenv at `dir`. Nothing is created yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the environment.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.dir.join("Scripts")
        } else {
            self.dir.join("bin")
        }
    }

    /// Path of an executable installed into the environment.
    pub fn executable(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    /// Whether the environment directory exists.
    pub fn exists(&self) -> bool {
        self.dir.exists()
    }

    /// Create the environment with `python -m venv` unless it already exists.
    ///
    /// Returns `true` if it was created. A failed creation is not rolled back.
    pub async fn ensure<R: ToolRunner>(
        &self,
        runner: &R,
        python: &str,
    ) -> Result<bool, ProvisionError> {
        if self.exists() {
            tracing::debug!("Using existing virtualenv at {}", self.dir.display());
            return Ok(false);
        }

        tracing::info!("Creating virtualenv at {}", self.dir.display());

        let invocation = Invocation::new(python).args(["-m", "venv"]).arg(&self.dir);
        runner
            .run(&invocation)
            .await
            .and_then(|out| out.ensure_success(&invocation))
            .map_err(|source| ProvisionError::CreateEnv {
                path: self.dir.clone(),
                source,
            })?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvlc_docs_tools::RecordingRunner;
    use tempfile::tempdir;

    #[tokio::test]
    async fn existing_env_is_left_alone() {
        let temp = tempdir().unwrap();
        let venv = VirtualEnv::new(temp.path());
        let runner = RecordingRunner::new();

        let created = venv.ensure(&runner, "python3").await.unwrap();

        assert!(!created);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn creates_missing_env_with_venv_module() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("virtualenv");
        let venv = VirtualEnv::new(&dir);
        let runner = RecordingRunner::new();

        let created = venv.ensure(&runner, "python3").await.unwrap();

        assert!(created);
        let call = runner.call_to("python3").unwrap();
        assert_eq!(
            call.arg_strings(),
            vec!["-m".to_string(), "venv".to_string(), dir.display().to_string()]
        );
    }

    #[tokio::test]
    async fn failed_creation_is_fatal() {
        let temp = tempdir().unwrap();
        let venv = VirtualEnv::new(temp.path().join("virtualenv"));
        let runner = RecordingRunner::new().fail("python3", 1);

        let err = venv.ensure(&runner, "python3").await.unwrap_err();

        assert!(matches!(err, ProvisionError::CreateEnv { .. }));
    }

    #[test]
    fn executables_live_in_bin_dir() {
        let venv = VirtualEnv::new("virtualenv");

        assert_eq!(venv.executable("pip"), venv.bin_dir().join("pip"));
        assert!(venv.bin_dir().starts_with("virtualenv"));
    }
}
