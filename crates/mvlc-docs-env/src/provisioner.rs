//! The fixed toolchain install sequence.

use std::path::PathBuf;

use mvlc_docs_tools::{ToolError, ToolRunner};

use crate::pip::{PackageSpec, Pip};
use crate::venv::VirtualEnv;

/// Packages installed into the virtualenv, in install order.
///
/// Sphinx 3.3.0 is the release Breathe 4.25.0 works with. It needs docutils
/// 0.17.1 (sphinx-doc/sphinx#9777) and a Jinja2 older than 3.1
/// (sphinx-doc/sphinx#10291), so those go in first.
pub const TOOLCHAIN: &[PackageSpec] = &[
    PackageSpec::Registry("wheel"),
    PackageSpec::Registry("six"),
    PackageSpec::Registry("docutils==0.17.1"),
    PackageSpec::Registry("Jinja2<3.1"),
    PackageSpec::Git {
        repo: "sphinx-doc/sphinx",
        rev: "v3.3.0",
    },
    PackageSpec::Git {
        repo: "michaeljones/breathe",
        rev: "v4.25.0",
    },
];

/// Errors that can occur while provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Failed to create virtualenv at {}: {source}", .path.display())]
    CreateEnv {
        path: PathBuf,
        #[source]
        source: ToolError,
    },

    #[error("Failed to install {package}: {source}")]
    Install {
        package: String,
        #[source]
        source: ToolError,
    },
}

impl ProvisionError {
    /// The underlying tool failure.
    pub fn tool_error(&self) -> &ToolError {
        match self {
            ProvisionError::CreateEnv { source, .. } | ProvisionError::Install { source, .. } => {
                source
            }
        }
    }
}

/// Creates the virtualenv and installs [`TOOLCHAIN`] into it.
#[derive(Debug, Clone)]
pub struct Provisioner {
    venv: VirtualEnv,
    python: String,
    packages: Vec<PackageSpec>,
}

impl Provisioner {
    /// Provision `venv` using the `python` interpreter to create it.
    pub fn new(venv: VirtualEnv, python: impl Into<String>) -> Self {
        Self {
            venv,
            python: python.into(),
            packages: TOOLCHAIN.to_vec(),
        }
    }

    /// The environment being provisioned.
    pub fn venv(&self) -> &VirtualEnv {
        &self.venv
    }

    /// Ensure the environment exists, then install every package in order.
    ///
    /// Stops at the first failure; nothing installed so far is undone.
    pub async fn run<R: ToolRunner>(&self, runner: &R) -> Result<(), ProvisionError> {
        self.venv.ensure(runner, &self.python).await?;

        let pip = Pip::new(&self.venv);
        for package in &self.packages {
            pip.install(runner, package).await?;
        }

        tracing::info!(
            "Toolchain ready in {} ({} packages)",
            self.venv.dir().display(),
            self.packages.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvlc_docs_tools::RecordingRunner;
    use tempfile::tempdir;

    #[tokio::test]
    async fn installs_toolchain_in_fixed_order() {
        let temp = tempdir().unwrap();
        let runner = RecordingRunner::new();
        let provisioner = Provisioner::new(VirtualEnv::new(temp.path()), "python3");

        provisioner.run(&runner).await.unwrap();

        let installed: Vec<String> = runner
            .calls()
            .iter()
            .map(|call| call.arg_strings()[1].clone())
            .collect();
        assert_eq!(
            installed,
            vec![
                "wheel",
                "six",
                "docutils==0.17.1",
                "Jinja2<3.1",
                "git+https://github.com/sphinx-doc/sphinx.git@v3.3.0",
                "git+https://github.com/michaeljones/breathe.git@v4.25.0",
            ]
        );
    }

    #[tokio::test]
    async fn creates_env_before_installing() {
        let temp = tempdir().unwrap();
        let runner = RecordingRunner::new();
        let provisioner =
            Provisioner::new(VirtualEnv::new(temp.path().join("virtualenv")), "python3");

        provisioner.run(&runner).await.unwrap();

        let programs = runner.programs();
        assert_eq!(programs[0], "python3");
        assert!(programs[1..].iter().all(|p| p == "pip"));
        assert_eq!(programs.len(), 1 + TOOLCHAIN.len());
    }

    #[tokio::test]
    async fn install_failure_aborts_remaining_packages() {
        let temp = tempdir().unwrap();
        let runner = RecordingRunner::new().fail("pip", 1);
        let provisioner = Provisioner::new(VirtualEnv::new(temp.path()), "python3");

        let err = provisioner.run(&runner).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Install { ref package, .. } if package == "wheel"));
        assert_eq!(runner.calls().len(), 1);
        assert_eq!(err.tool_error().exit_code(), 1);
    }
}
