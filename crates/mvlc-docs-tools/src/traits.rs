//! The tool runner seam and its result types.

use std::future::Future;

use crate::invocation::Invocation;

/// Outcome of a tool that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,

    /// Combined stdout/stderr log (empty unless the invocation captured output)
    pub output: String,
}

impl ToolOutput {
    /// Create an output with the given exit code and captured log.
    pub fn new(code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
        }
    }

    /// Whether the tool exited with status 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`ToolError::Failed`].
    pub fn ensure_success(&self, invocation: &Invocation) -> Result<(), ToolError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: invocation.program_name(),
                code: self.code,
            })
        }
    }
}

/// Errors raised while running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with {}", describe_exit(.code))]
    Failed { program: String, code: Option<i32> },
}

impl ToolError {
    /// Process exit status to report for this failure.
    ///
    /// A failed tool hands its own exit code on; anything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Failed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Runs external tools.
///
/// Implementations only report what happened. Whether a non-zero exit is an
/// error is up to the caller (see [`ToolOutput::ensure_success`]).
pub trait ToolRunner: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// Returns [`ToolError::NotFound`] when the program does not exist.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<ToolOutput, ToolError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exit_is_success() {
        let inv = Invocation::new("doxygen");

        assert!(ToolOutput::new(Some(0), "").ensure_success(&inv).is_ok());
    }

    #[test]
    fn non_zero_exit_is_failure_with_code() {
        let inv = Invocation::new("sphinx-build");
        let err = ToolOutput::new(Some(2), "")
            .ensure_success(&inv)
            .unwrap_err();

        assert!(matches!(
            err,
            ToolError::Failed { ref program, code: Some(2) } if program == "sphinx-build"
        ));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "sphinx-build failed with exit status 2");
    }

    #[test]
    fn signal_termination_reports_status_one() {
        let inv = Invocation::new("doxygen");
        let err = ToolOutput::new(None, "").ensure_success(&inv).unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn out_of_range_codes_fall_back_to_one() {
        let err = ToolError::Failed {
            program: "pip".into(),
            code: Some(-3),
        };

        assert_eq!(err.exit_code(), 1);
    }
}
