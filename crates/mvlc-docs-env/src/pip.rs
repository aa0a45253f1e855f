//! Package installation with the environment's pip.

use std::path::PathBuf;

use mvlc_docs_tools::{Invocation, ToolRunner};

use crate::provisioner::ProvisionError;
use crate::venv::VirtualEnv;

/// A package to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSpec {
    /// A requirement resolved from the package index, e.g. `Jinja2<3.1`.
    Registry(&'static str),

    /// A GitHub repository (`owner/name`) at a tag or commit.
    Git {
        repo: &'static str,
        rev: &'static str,
    },
}

impl PackageSpec {
    /// The argument handed to `pip install`.
    pub fn install_target(&self) -> String {
        match self {
            PackageSpec::Registry(requirement) => requirement.to_string(),
            PackageSpec::Git { repo, rev } => {
                format!("git+https://github.com/{}.git@{}", repo, rev)
            }
        }
    }
}

/// The pip executable of a virtualenv.
#[derive(Debug, Clone)]
pub struct Pip {
    path: PathBuf,
}

impl Pip {
    /// Use the pip installed in `venv`.
    pub fn new(venv: &VirtualEnv) -> Self {
        Self {
            path: venv.executable("pip"),
        }
    }

    /// Install one package. A non-zero pip exit is an error.
    pub async fn install<R: ToolRunner>(
        &self,
        runner: &R,
        package: &PackageSpec,
    ) -> Result<(), ProvisionError> {
        let target = package.install_target();
        tracing::info!("Installing {}", target);

        let invocation = Invocation::new(&self.path).arg("install").arg(&target);
        runner
            .run(&invocation)
            .await
            .and_then(|out| out.ensure_success(&invocation))
            .map_err(|source| ProvisionError::Install {
                package: target,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvlc_docs_tools::RecordingRunner;

    #[test]
    fn registry_requirement_is_passed_verbatim() {
        let spec = PackageSpec::Registry("docutils==0.17.1");

        assert_eq!(spec.install_target(), "docutils==0.17.1");
    }

    #[test]
    fn git_source_resolves_to_revision_url() {
        let spec = PackageSpec::Git {
            repo: "sphinx-doc/sphinx",
            rev: "v3.3.0",
        };

        assert_eq!(
            spec.install_target(),
            "git+https://github.com/sphinx-doc/sphinx.git@v3.3.0"
        );
    }

    #[tokio::test]
    async fn installs_with_venv_pip() {
        let venv = VirtualEnv::new("virtualenv");
        let runner = RecordingRunner::new();

        Pip::new(&venv)
            .install(&runner, &PackageSpec::Registry("wheel"))
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, venv.executable("pip").into_os_string());
        assert_eq!(calls[0].arg_strings(), vec!["install", "wheel"]);
    }

    #[tokio::test]
    async fn pip_failure_names_the_package() {
        let runner = RecordingRunner::new().fail("pip", 1);

        let err = Pip::new(&VirtualEnv::new("virtualenv"))
            .install(&runner, &PackageSpec::Registry("Jinja2<3.1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::Install { ref package, .. } if package == "Jinja2<3.1"
        ));
    }
}
