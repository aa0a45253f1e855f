//! Configuration file (docs.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mvlc_docs_build::{BuildOptions, StyleOptions};
use mvlc_docs_env::{Provisioner, VirtualEnv};
use serde::Deserialize;

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    project: ProjectConfig,
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    versions: VersionsConfig,
    #[serde(default)]
    tools: ToolsConfig,
    #[serde(default)]
    style: StyleConfig,
}

#[derive(Debug, Deserialize)]
struct ProjectConfig {
    #[serde(default = "default_project_name")]
    name: String,
}

#[derive(Debug, Deserialize, Default)]
struct PathsConfig {
    /// Sphinx sources, relative to the config file
    doc_dir: Option<PathBuf>,
    /// Headers and sources, relative to the config file
    include_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    /// Virtualenv, relative to the work directory
    venv: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct VersionsConfig {
    /// Released versions, oldest first
    #[serde(default = "default_history")]
    history: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ToolsConfig {
    #[serde(default = "default_python")]
    python: String,
    #[serde(default = "default_doxygen")]
    doxygen: PathBuf,
    sphinx_build: Option<PathBuf>,
    #[serde(default = "default_lessc")]
    lessc: PathBuf,
}

#[derive(Debug, Deserialize)]
struct StyleConfig {
    #[serde(default = "default_style_source")]
    source: PathBuf,
    #[serde(default = "default_style_target")]
    target: PathBuf,
    #[serde(default = "default_style_include_path")]
    include_path: PathBuf,
}

fn default_project_name() -> String {
    "mesytec-mvlc".to_string()
}
fn default_history() -> Vec<String> {
    vec!["0.0.0".to_string()]
}
fn default_python() -> String {
    "python3".to_string()
}
fn default_doxygen() -> PathBuf {
    PathBuf::from("doxygen")
}
fn default_lessc() -> PathBuf {
    PathBuf::from("lessc")
}
fn default_style_source() -> PathBuf {
    StyleOptions::default().source
}
fn default_style_target() -> PathBuf {
    StyleOptions::default().target
}
fn default_style_include_path() -> PathBuf {
    StyleOptions::default().include_path
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            history: default_history(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            doxygen: default_doxygen(),
            sphinx_build: None,
            lessc: default_lessc(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            source: default_style_source(),
            target: default_style_target(),
            include_path: default_style_include_path(),
        }
    }
}

/// Loaded configuration plus the directory it was loaded from.
#[derive(Debug)]
pub struct Config {
    file: ConfigFile,
    base_dir: PathBuf,
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self {
                file: ConfigFile::default(),
                base_dir: PathBuf::from("."),
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { file, base_dir })
    }

    /// Work directory, preferring a command-line override.
    pub fn work_dir(&self, work_dir: Option<PathBuf>) -> PathBuf {
        work_dir
            .or_else(|| self.file.paths.work_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The toolchain virtualenv.
    pub fn venv(&self, work_dir: &Path) -> VirtualEnv {
        let venv = self
            .file
            .paths
            .venv
            .clone()
            .unwrap_or_else(|| PathBuf::from("virtualenv"));
        VirtualEnv::new(work_dir.join(venv))
    }

    /// Provisioner for the toolchain virtualenv.
    pub fn provisioner(&self, work_dir: &Path) -> Provisioner {
        Provisioner::new(self.venv(work_dir), self.file.tools.python.clone())
    }

    /// Build options for `version`.
    pub fn build_options(&self, version: String, work_dir: &Path) -> BuildOptions {
        let paths = &self.file.paths;
        let tools = &self.file.tools;
        let style = &self.file.style;

        let doc_dir = match &paths.doc_dir {
            Some(dir) => self.base_dir.join(dir),
            None => self.base_dir.clone(),
        };

        BuildOptions {
            version,
            versions: self.file.versions.history.clone(),
            project: self.file.project.name.clone(),
            doc_dir,
            include_dir: paths.include_dir.as_ref().map(|dir| self.base_dir.join(dir)),
            work_dir: work_dir.to_path_buf(),
            doxygen: tools.doxygen.clone(),
            sphinx_build: Some(
                tools
                    .sphinx_build
                    .clone()
                    .unwrap_or_else(|| self.venv(work_dir).executable("sphinx-build")),
            ),
            lessc: tools.lessc.clone(),
            style: StyleOptions {
                source: style.source.clone(),
                target: style.target.clone(),
                include_path: style.include_path.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("docs.toml")).unwrap();
        let options = config.build_options("dev".to_string(), Path::new("."));

        assert_eq!(options.project, "mesytec-mvlc");
        assert_eq!(options.versions, vec!["0.0.0"]);
        assert_eq!(options.doc_dir, PathBuf::from("."));
        assert_eq!(options.doxygen, PathBuf::from("doxygen"));
        assert_eq!(options.lessc, PathBuf::from("lessc"));
        assert_eq!(
            options.sphinx_build,
            Some(VirtualEnv::new("./virtualenv").executable("sphinx-build"))
        );
        assert!(options.include_dir.is_none());
    }

    #[test]
    fn paths_resolve_against_config_directory() {
        let temp = tempdir().unwrap();
        let doc = temp.path().join("doc");
        fs::create_dir_all(&doc).unwrap();
        let path = doc.join("docs.toml");
        fs::write(
            &path,
            r#"
[paths]
include_dir = "../src/mesytec-mvlc"
work_dir = "build"
venv = "env"

[versions]
history = ["1.0.0", "1.1.0"]

[tools]
doxygen = "/opt/doxygen/bin/doxygen"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let work_dir = config.work_dir(None);
        let options = config.build_options("1.1.0".to_string(), &work_dir);

        assert_eq!(work_dir, PathBuf::from("build"));
        assert_eq!(options.doc_dir, doc);
        assert_eq!(options.include_dir, Some(doc.join("../src/mesytec-mvlc")));
        assert_eq!(options.versions, vec!["1.0.0", "1.1.0"]);
        assert_eq!(options.doxygen, PathBuf::from("/opt/doxygen/bin/doxygen"));
        assert_eq!(
            options.sphinx_build,
            Some(VirtualEnv::new("build/env").executable("sphinx-build"))
        );
    }

    #[test]
    fn command_line_work_dir_wins() {
        let config = Config::load(Path::new("does-not-exist.toml")).unwrap();

        assert_eq!(
            config.work_dir(Some(PathBuf::from("/tmp/out"))),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[versions]\nhistory = 3\n").unwrap();

        let err = Config::load(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
