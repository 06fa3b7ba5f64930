// Process execution for the hook: virtualenv creation, pip installs and the lint run.
// All external tools go through the CommandRunner trait so tests can substitute a fake.

use crate::error::{HookError, ProcessError, Result};
use std::ffi::OsString;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::debug;

/// Process execution configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub command: String,
    pub args: Vec<OsString>,
    /// Capture stdout/stderr instead of inheriting this process's streams
    pub capture_output: bool,
}

impl ProcessConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            capture_output: true,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_additional_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Command line as shown in diagnostics
    pub fn command_line(&self) -> String {
        let mut line = self.command.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Process execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration: Duration,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Turn a non-zero exit into an `ExecutionFailed` error carrying the output
    pub fn check(self, config: &ProcessConfig) -> Result<ProcessResult> {
        if self.success() {
            return Ok(self);
        }
        Err(HookError::from(ProcessError::ExecutionFailed {
            command: config.command_line(),
            exit_code: self.exit_code,
            stdout: self.stdout(),
            stderr: self.stderr(),
        }))
    }
}

/// Capability to run an external command to completion
pub trait CommandRunner {
    fn run(&self, config: &ProcessConfig) -> Result<ProcessResult>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, config: &ProcessConfig) -> Result<ProcessResult> {
        (**self).run(config)
    }
}

/// Default runner spawning real processes on a current-thread tokio runtime.
///
/// Children inherit the process environment as it is at spawn time, so an
/// active `VenvActivation` applies to them.
#[derive(Debug, Default, Clone)]
pub struct ProcessManager;

impl ProcessManager {
    pub fn new() -> Self {
        Self
    }

    // Synchronous execution
    pub fn execute(&self, config: &ProcessConfig) -> Result<ProcessResult> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(HookError::Io)?
            .block_on(self.execute_async(config))
    }

    pub async fn execute_async(&self, config: &ProcessConfig) -> Result<ProcessResult> {
        use tokio::process::Command;

        let start_time = Instant::now();
        debug!(command = %config.command_line(), capture = config.capture_output, "Spawning process");

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);
        cmd.stdin(Stdio::null());

        if config.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let child = cmd.spawn().map_err(|e| spawn_error(config, e))?;

        let output = child.wait_with_output().await.map_err(|e| {
            HookError::from(ProcessError::ExecutionFailed {
                command: config.command_line(),
                exit_code: None,
                stdout: String::new(),
                stderr: format!("Failed to wait for process: {e}"),
            })
        })?;

        let result = ProcessResult {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            duration: start_time.elapsed(),
        };
        debug!(
            command = %config.command,
            exit_code = ?result.exit_code,
            duration_ms = result.duration.as_millis(),
            "Process finished"
        );
        Ok(result)
    }
}

impl CommandRunner for ProcessManager {
    fn run(&self, config: &ProcessConfig) -> Result<ProcessResult> {
        self.execute(config)
    }
}

fn spawn_error(config: &ProcessConfig, error: std::io::Error) -> HookError {
    if error.kind() == std::io::ErrorKind::NotFound {
        HookError::from(ProcessError::CommandNotFound {
            command: config.command.clone(),
            suggestion: Some(format!(
                "Make sure '{}' is installed and on PATH",
                config.command
            )),
        })
    } else {
        HookError::from(ProcessError::SpawnFailed {
            command: config.command_line(),
            error: error.to_string(),
        })
    }
}
