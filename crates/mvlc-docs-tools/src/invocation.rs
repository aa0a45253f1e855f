//! Description of a single external tool call.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

/// A program, its arguments, and how its standard streams are wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute, either a bare name looked up on `PATH` or a path.
    pub program: OsString,

    /// Arguments, in order.
    pub args: Vec<OsString>,

    /// Text written to the program's standard input, which is then closed.
    pub stdin: Option<String>,

    /// Capture stdout and stderr as one combined log instead of inheriting them.
    pub capture: bool,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            stdin: None,
            capture: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Feed `input` to the program's standard input.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Capture the combined stdout/stderr log.
    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Program as a display string, used in errors and logs.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// File name of the program (`/venv/bin/pip` -> `pip`).
    pub fn program_file_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program_name())
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
