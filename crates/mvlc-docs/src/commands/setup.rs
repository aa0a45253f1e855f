//! Toolchain provisioning command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mvlc_docs_tools::SystemRunner;

use crate::config::Config;

/// Run the setup command.
pub async fn run(config_path: &Path, work_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    let work_dir = config.work_dir(work_dir);

    provision(&config, &work_dir).await
}

/// Create the virtualenv if needed and install the pinned toolchain.
pub async fn provision(config: &Config, work_dir: &Path) -> Result<()> {
    let provisioner = config.provisioner(work_dir);
    tracing::info!(
        "Provisioning documentation toolchain in {}",
        provisioner.venv().dir().display()
    );

    provisioner
        .run(&SystemRunner::new())
        .await
        .context("Failed to provision documentation toolchain")
}
