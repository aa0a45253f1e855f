//! Runs tools as real child processes.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;

use crate::invocation::Invocation;
use crate::traits::{ToolError, ToolOutput, ToolRunner};

/// [`ToolRunner`] backed by `tokio::process`.
///
/// There is no timeout: a tool that hangs hangs the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        let program = invocation.program_name();
        tracing::debug!("Running {}", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        if invocation.stdin.is_some() {
            command.stdin(Stdio::piped());
        }
        if invocation.capture {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let mut child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ToolError::NotFound {
                    program: program.clone(),
                }
            } else {
                ToolError::Spawn {
                    program: program.clone(),
                    source,
                }
            }
        })?;

        let io_error = |source| ToolError::Io {
            program: program.clone(),
            source,
        };

        let (_, output) = tokio::try_join!(
            feed_stdin(child.stdin.take(), invocation.stdin.as_deref()),
            collect_combined(child.stdout.take(), child.stderr.take()),
        )
        .map_err(io_error)?;

        let status = child.wait().await.map_err(io_error)?;

        Ok(ToolOutput::new(status.code(), output))
    }
}

/// Write `input` to the child and close its stdin.
///
/// A tool may exit without reading its input; the resulting broken pipe is
/// not an error, the exit status decides.
async fn feed_stdin(stdin: Option<ChildStdin>, input: Option<&str>) -> io::Result<()> {
    let (Some(mut stdin), Some(input)) = (stdin, input) else {
        return Ok(());
    };

    match stdin.write_all(input.as_bytes()).await {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Merge stdout and stderr line by line in arrival order.
///
/// Bytes that are not UTF-8 are replaced, so a log never fails the capture.
async fn collect_combined(
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> io::Result<String> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut readers = Vec::new();

    if let Some(stdout) = stdout {
        readers.push(tokio::spawn(forward_lines(stdout, tx.clone())));
    }
    if let Some(stderr) = stderr {
        readers.push(tokio::spawn(forward_lines(stderr, tx.clone())));
    }
    drop(tx);

    let mut combined = String::new();
    while let Some(line) = rx.recv().await {
        combined.push_str(&line);
        combined.push('\n');
    }

    for reader in readers {
        reader.await.map_err(io::Error::other)??;
    }

    Ok(combined)
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if tx.send(String::from_utf8_lossy(line).into_owned()).is_err() {
            return Ok(());
        }
    }
}
