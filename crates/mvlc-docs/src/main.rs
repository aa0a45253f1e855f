//! mvlc-docs CLI - builds the mesytec-mvlc API documentation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mvlc_docs_build::{BuildError, LESSC_GUIDANCE};
use mvlc_docs_env::ProvisionError;
use mvlc_docs_tools::ToolError;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "mvlc-docs")]
#[command(about = "Build the mesytec-mvlc documentation with Doxygen, Sphinx and Breathe")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docs.toml config file
    #[arg(short, long, default_value = "docs.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the virtualenv and install the pinned Sphinx toolchain
    Setup {
        /// Work directory holding the virtualenv (defaults to config or ".")
        #[arg(short, long)]
        work_dir: Option<PathBuf>,
    },

    /// Build the HTML documentation
    Build {
        /// Version label shown in the generated docs
        #[arg(default_value = "dev")]
        version: String,

        /// Work directory for doxyxml/ and html/ (defaults to config or ".")
        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        /// Do not provision the toolchain first
        #[arg(long)]
        skip_setup: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    let result = match cli.command {
        Commands::Setup { work_dir } => commands::setup::run(&cli.config, work_dir).await,
        Commands::Build {
            version,
            work_dir,
            skip_setup,
        } => commands::build::run(&cli.config, version, work_dir, skip_setup).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Print a failure and pick the process exit status.
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(BuildError::StyleCompilerMissing { .. }) = find_cause::<BuildError>(err) {
        println!("{}", LESSC_GUIDANCE);
        return ExitCode::from(1);
    }

    tracing::error!("{:#}", err);
    ExitCode::from(tool_exit_code(err).unwrap_or(1))
}

/// Exit code of the tool that failed, if a tool failure caused `err`.
fn tool_exit_code(err: &anyhow::Error) -> Option<u8> {
    if let Some(tool) = find_cause::<ToolError>(err) {
        return Some(tool.exit_code());
    }
    if let Some(BuildError::Tool(tool)) = find_cause::<BuildError>(err) {
        return Some(tool.exit_code());
    }
    find_cause::<ProvisionError>(err).map(|e| e.tool_error().exit_code())
}

fn find_cause<E>(err: &anyhow::Error) -> Option<&E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    err.chain().find_map(|cause| cause.downcast_ref::<E>())
}
