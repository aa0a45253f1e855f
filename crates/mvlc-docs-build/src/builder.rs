//! Documentation builder.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mvlc_docs_env::VirtualEnv;
use mvlc_docs_tools::{Invocation, ToolError, ToolRunner};

use crate::doxygen::DoxygenConfig;
use crate::sources::discover_sources;
use crate::versions::navigation_versions;
use crate::warnings::{FilteredLog, WarningFilter};

/// Printed when `lessc` is not installed.
pub const LESSC_GUIDANCE: &str =
    "lessc not found; make sure that Less (http://lesscss.org/) is installed";

/// Stylesheet compilation settings.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Less source, relative to the doc directory
    pub source: PathBuf,

    /// Compiled CSS, relative to the HTML directory. Overwrites Sphinx's file.
    pub target: PathBuf,

    /// Less include path, relative to the doc directory
    pub include_path: PathBuf,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("fmt.less"),
            target: PathBuf::from("_static").join("normalize.css"),
            include_path: PathBuf::from("bootstrap"),
        }
    }
}

/// Configuration for one documentation build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Version label substituted into the site
    pub version: String,

    /// Released versions, oldest first
    pub versions: Vec<String>,

    /// Doxygen project name; also names the Breathe project
    pub project: String,

    /// Sphinx source directory (conf.py, index.rst, stylesheets)
    pub doc_dir: PathBuf,

    /// Headers and sources to document. Defaults to `<doc_dir>/../src/<project>`.
    pub include_dir: Option<PathBuf>,

    /// Directory receiving `doxyxml/` and `html/`
    pub work_dir: PathBuf,

    /// Doxygen executable
    pub doxygen: PathBuf,

    /// sphinx-build executable. Defaults to the one in `<work_dir>/virtualenv`.
    pub sphinx_build: Option<PathBuf>,

    /// Less compiler executable
    pub lessc: PathBuf,

    /// Stylesheet compilation settings
    pub style: StyleOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            version: "dev".to_string(),
            versions: vec!["0.0.0".to_string()],
            project: "mesytec-mvlc".to_string(),
            doc_dir: PathBuf::from("."),
            include_dir: None,
            work_dir: PathBuf::from("."),
            doxygen: PathBuf::from("doxygen"),
            sphinx_build: None,
            lessc: PathBuf::from("lessc"),
            style: StyleOptions::default(),
        }
    }
}

impl BuildOptions {
    /// Directory scanned for inputs.
    pub fn include_dir(&self) -> PathBuf {
        if let Some(dir) = &self.include_dir {
            return dir.clone();
        }

        let doc_dir = fs::canonicalize(&self.doc_dir)
            .or_else(|_| std::path::absolute(&self.doc_dir))
            .unwrap_or_else(|_| self.doc_dir.clone());
        doc_dir
            .parent()
            .unwrap_or(&doc_dir)
            .join("src")
            .join(&self.project)
    }

    /// Doxygen XML output directory.
    pub fn xml_dir(&self) -> PathBuf {
        self.work_dir.join("doxyxml")
    }

    /// Generated HTML directory.
    pub fn html_dir(&self) -> PathBuf {
        self.work_dir.join("html")
    }

    /// sphinx-build executable to run.
    pub fn sphinx_build(&self) -> PathBuf {
        self.sphinx_build.clone().unwrap_or_else(|| {
            VirtualEnv::new(self.work_dir.join("virtualenv")).executable("sphinx-build")
        })
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// Generated HTML directory
    pub html_dir: PathBuf,

    /// Number of files handed to Doxygen
    pub inputs: usize,

    /// Number of Doxygen log lines filtered out as noise
    pub suppressed_warnings: usize,

    /// Number of Doxygen log lines left after filtering
    pub diagnostics: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to resolve path {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{}", LESSC_GUIDANCE)]
    StyleCompilerMissing { program: String },
}

/// Runs extraction, generation and style compilation in sequence.
pub struct DocBuilder {
    options: BuildOptions,
}

impl DocBuilder {
    /// Create a new builder.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the documentation. Any tool failure aborts the build.
    pub async fn build<R: ToolRunner>(&self, runner: &R) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let include_dir = self.options.include_dir();
        let inputs = discover_sources(&include_dir);
        if inputs.is_empty() {
            tracing::warn!("No headers or sources found in {}", include_dir.display());
        }

        let xml_dir = self.options.xml_dir();
        let log = self.extract(runner, &inputs, &xml_dir).await?;

        let html_dir = self.generate(runner, &xml_dir).await?;

        self.compile_style(runner, &html_dir).await?;

        Ok(BuildResult {
            html_dir,
            inputs: inputs.len(),
            suppressed_warnings: log.suppressed,
            diagnostics: log.text.lines().count(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run Doxygen and print its log minus known noise.
    ///
    /// Returns the filtered log. The exit status alone decides success.
    async fn extract<R: ToolRunner>(
        &self,
        runner: &R,
        inputs: &[PathBuf],
        xml_dir: &Path,
    ) -> Result<FilteredLog, BuildError> {
        tracing::info!("Extracting API model from {} files", inputs.len());

        let config = DoxygenConfig::new(&self.options.project, inputs.to_vec(), xml_dir);
        let invocation = Invocation::new(&self.options.doxygen)
            .arg("-")
            .stdin(config.render())
            .capture_output();

        let output = runner.run(&invocation).await?;

        let filtered = WarningFilter::doxygen().apply(&output.output);
        tracing::debug!("Suppressed {} known Doxygen warnings", filtered.suppressed);
        if !filtered.text.is_empty() {
            println!("{}", filtered.text);
            tracing::warn!(
                "Doxygen reported {} diagnostics",
                filtered.text.lines().count()
            );
        }

        output.ensure_success(&invocation)?;

        Ok(filtered)
    }

    /// Render HTML with Sphinx from the Doxygen XML.
    async fn generate<R: ToolRunner>(
        &self,
        runner: &R,
        xml_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        let version = &self.options.version;
        tracing::info!("Generating HTML for version {}", version);

        let xml_dir = std::path::absolute(xml_dir).map_err(|source| BuildError::Path {
            path: xml_dir.to_path_buf(),
            source,
        })?;
        let html_dir = self.options.html_dir();

        let breathe_project = format!(
            "-Dbreathe_projects.{}=",
            self.options.project.replace('-', "_")
        );

        let invocation = Invocation::new(self.options.sphinx_build())
            .arg(join_os(&breathe_project, &xml_dir))
            .arg(format!("-Dversion={}", version))
            .arg(format!("-Drelease={}", version))
            .arg(format!("-Aversion={}", version))
            .arg(format!(
                "-Aversions={}",
                navigation_versions(&self.options.versions)
            ))
            .args(["-b", "html"])
            .arg(&self.options.doc_dir)
            .arg(&html_dir);

        runner
            .run(&invocation)
            .await?
            .ensure_success(&invocation)?;

        Ok(html_dir)
    }

    /// Compile the site stylesheet over the one Sphinx generated.
    async fn compile_style<R: ToolRunner>(
        &self,
        runner: &R,
        html_dir: &Path,
    ) -> Result<(), BuildError> {
        let style = &self.options.style;
        let target = html_dir.join(&style.target);
        tracing::info!("Compiling stylesheet into {}", target.display());

        let invocation = Invocation::new(&self.options.lessc)
            .args(["--verbose", "--clean-css"])
            .arg(join_os(
                "--include-path=",
                &self.options.doc_dir.join(&style.include_path),
            ))
            .arg(self.options.doc_dir.join(&style.source))
            .arg(&target);

        match runner.run(&invocation).await {
            Ok(output) => Ok(output.ensure_success(&invocation)?),
            Err(ToolError::NotFound { program }) => {
                Err(BuildError::StyleCompilerMissing { program })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `prefix` followed by `path`, without a lossy conversion.
fn join_os(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path);
    arg
}
