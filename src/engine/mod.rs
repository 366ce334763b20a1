//! Live query execution.
//!
//! Translation itself is out of scope for this crate. The detail pane reaches
//! an engine only through [`QueryEngine`]. The binary wires in a
//! [`CommandEngine`] when `--engine` is given and an [`UnconfiguredEngine`]
//! otherwise.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Query text plus the language pair to run it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub text: String,
    pub from: String,
    pub to: String,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { text: text.into(), from: from.into(), to: to.into() }
    }
}

/// Runs a query and produces a result string
pub trait QueryEngine {
    /// Short identifier shown next to results
    fn name(&self) -> &str;

    fn query(&self, request: &QueryRequest) -> Result<String>;
}

/// Engine backed by a shell command.
///
/// The query text is written to the command's stdin and the language pair is
/// passed as `QUERY_FROM` / `QUERY_TO`. Trimmed stdout is the result.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: String,
}

impl CommandEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl QueryEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.command
    }

    fn query(&self, request: &QueryRequest) -> Result<String> {
        debug!(
            command = %self.command,
            from = %request.from,
            to = %request.to,
            "running query engine"
        );

        let mut child = self
            .shell()
            .env("QUERY_FROM", &request.from)
            .env("QUERY_TO", &request.to)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start engine command: {}", self.command))?;

        // Commands that ignore stdin may exit before the write lands
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(request.text.as_bytes())
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(e).context("Failed to send query to engine command");
        }

        let output = child.wait_with_output().context("Failed to wait for engine command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Engine command failed ({}): {}", output.status, stderr.trim());
        }

        let result = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if result.is_empty() {
            bail!("Engine command returned no result");
        }
        Ok(result)
    }
}

/// Placeholder used when no engine is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredEngine;

impl QueryEngine for UnconfiguredEngine {
    fn name(&self) -> &str {
        "none"
    }

    fn query(&self, _request: &QueryRequest) -> Result<String> {
        bail!("No query engine configured (set --engine or QUERY_HISTORY_ENGINE)")
    }
}
