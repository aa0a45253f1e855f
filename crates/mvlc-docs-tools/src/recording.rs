//! Scripted runner for exercising build steps without the real tools.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::invocation::Invocation;
use crate::traits::{ToolError, ToolOutput, ToolRunner};

#[derive(Debug, Clone)]
enum Response {
    Exit { code: i32, output: String },
    Missing,
}

/// A [`ToolRunner`] that records invocations and answers from a script.
///
/// Responses are keyed by program, matching either the full program string or
/// its file name. Unscripted programs exit 0 with no output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    /// Create a runner where every program succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` exit with `code` and print `output`.
    pub fn respond(self, program: &str, code: i32, output: &str) -> Self {
        self.script(
            program,
            Response::Exit {
                code,
                output: output.to_string(),
            },
        )
    }

    /// Make `program` fail with `code` and no output.
    pub fn fail(self, program: &str, code: i32) -> Self {
        self.respond(program, code, "")
    }

    /// Make `program` behave as if it were not installed.
    pub fn missing(self, program: &str) -> Self {
        self.script(program, Response::Missing)
    }

    fn script(self, program: &str, response: Response) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(program.to_string(), response);
        self
    }

    /// All invocations seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// File names of the programs invoked so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(Invocation::program_file_name)
            .collect()
    }

    /// The first invocation of `program`, if any.
    pub fn call_to(&self, program: &str) -> Option<Invocation> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|inv| inv.program_file_name() == program || inv.program_name() == program)
            .cloned()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push(invocation.clone());

        let response = {
            let responses = self.responses.lock().unwrap();
            responses
                .get(&invocation.program_name())
                .or_else(|| responses.get(&invocation.program_file_name()))
                .cloned()
        };

        match response {
            None => Ok(ToolOutput::new(Some(0), "")),
            Some(Response::Exit { code, output }) => Ok(ToolOutput::new(Some(code), output)),
            Some(Response::Missing) => Err(ToolError::NotFound {
                program: invocation.program_name(),
            }),
        }
    }
}
