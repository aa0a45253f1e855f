//! Documentation build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mvlc_docs_build::DocBuilder;
use mvlc_docs_tools::SystemRunner;

use crate::commands::setup;
use crate::config::Config;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    version: String,
    work_dir: Option<PathBuf>,
    skip_setup: bool,
) -> Result<()> {
    tracing::info!("Building documentation for version {}", version);

    let config = Config::load(config_path)?;
    let work_dir = config.work_dir(work_dir);

    if skip_setup {
        tracing::debug!("Skipping toolchain provisioning");
    } else {
        setup::provision(&config, &work_dir).await?;
    }

    let options = config.build_options(version, &work_dir);
    let result = DocBuilder::new(options)
        .build(&SystemRunner::new())
        .await
        .context("Documentation build failed")?;

    tracing::info!(
        "Built documentation from {} inputs in {}ms ({} diagnostics, {} known warnings suppressed)",
        result.inputs,
        result.duration_ms,
        result.diagnostics,
        result.suppressed_warnings
    );

    tracing::info!("Output: {}", result.html_dir.display());

    Ok(())
}
