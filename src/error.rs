// Error handling for the pylint hook
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HookError>;

/// Main error type for the hook
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<ConfigError>),

    #[error("Process execution failed: {0}")]
    Process(#[from] Box<ProcessError>),

    #[error("CLI argument error: {0}")]
    Cli(#[from] Box<CliError>),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No active virtual environment: {variable} is not set")]
    NoActiveEnvironment {
        variable: String,
        suggestion: Option<String>,
    },

    #[error("Requirements file not found: {path}")]
    ManifestNotFound {
        path: PathBuf,
        suggestion: Option<String>,
    },

    #[error("Failed to read requirements file {path}: {message}")]
    ManifestUnreadable { path: PathBuf, message: String },
}

/// Process execution errors with detailed context
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Command failed: {command}")]
    ExecutionFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Command not found: {command}")]
    CommandNotFound {
        command: String,
        suggestion: Option<String>,
    },

    #[error("Process spawn failed: {command}: {error}")]
    SpawnFailed { command: String, error: String },
}

impl ProcessError {
    /// Render the captured command, stdout and stderr of a failed invocation
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            ProcessError::ExecutionFailed {
                command,
                stdout,
                stderr,
                ..
            } => Some(format!(
                "command:\n\n{command}\nstdout:\n\n{stdout}\nstderr:\n\n{stderr}\n"
            )),
            _ => None,
        }
    }
}

/// CLI argument errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Conflicting arguments: {first} and {second}")]
    ConflictingArguments {
        first: String,
        second: String,
        suggestion: String,
    },
}

/// Format errors with colors and context
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format an error with context and colors.
    ///
    /// The caller prints the result, so the structured record is debug only.
    pub fn format_error(&self, error: &HookError) -> String {
        use tracing::debug;

        match error {
            HookError::Config(_) => {
                debug!(error_type = "config", error = %error, "Configuration error occurred");
            }
            HookError::Process(_) => {
                debug!(error_type = "process", error = %error, "Process execution failed");
            }
            HookError::Cli(_) => {
                debug!(error_type = "cli", error = %error, "CLI error occurred");
            }
            HookError::Io(_) => {
                debug!(error_type = "io", error = %error, "IO operation failed");
            }
        }

        let mut output = String::new();

        if self.use_colors {
            output.push_str("\x1b[31m");
        }
        output.push_str("Error: ");
        if self.use_colors {
            output.push_str("\x1b[0m");
        }

        output.push_str(&error.to_string());

        match error {
            HookError::Config(config_err) => {
                self.add_config_context(&mut output, config_err.as_ref());
            }
            HookError::Process(process_err) => {
                self.add_process_context(&mut output, process_err.as_ref());
            }
            HookError::Cli(cli_err) => {
                self.add_cli_context(&mut output, cli_err.as_ref());
            }
            HookError::Io(_) => {}
        }

        output
    }

    fn add_config_context(&self, output: &mut String, error: &ConfigError) {
        match error {
            ConfigError::NoActiveEnvironment {
                suggestion: Some(suggestion),
                ..
            }
            | ConfigError::ManifestNotFound {
                suggestion: Some(suggestion),
                ..
            } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            _ => {}
        }
    }

    fn add_process_context(&self, output: &mut String, error: &ProcessError) {
        match error {
            ProcessError::ExecutionFailed { .. } => {
                if let Some(diagnostic) = error.diagnostic() {
                    output.push('\n');
                    output.push_str(&diagnostic);
                }
            }
            ProcessError::CommandNotFound {
                suggestion: Some(suggestion),
                ..
            } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            _ => {}
        }
    }

    fn add_cli_context(&self, output: &mut String, error: &CliError) {
        match error {
            CliError::ConflictingArguments { suggestion, .. } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
        }
    }
}

/// Exit codes for wrapper-level failures
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const CLI_ERROR: i32 = 7;
    pub const PROCESS_ERROR: i32 = 9;
}

impl HookError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HookError::Config(_) => exit_codes::CONFIG_ERROR,
            HookError::Process(process_err) => match process_err.as_ref() {
                // A failing child's own code is forwarded unchanged
                ProcessError::ExecutionFailed {
                    exit_code: Some(code),
                    ..
                } if *code != exit_codes::SUCCESS => *code,
                _ => exit_codes::PROCESS_ERROR,
            },
            HookError::Cli(_) => exit_codes::CLI_ERROR,
            HookError::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }

    /// Create a user-friendly error message with context
    pub fn user_message(&self, use_colors: bool) -> String {
        let formatter = ErrorFormatter::new(use_colors);
        formatter.format_error(self)
    }
}

impl From<ConfigError> for HookError {
    fn from(error: ConfigError) -> Self {
        HookError::Config(Box::new(error))
    }
}

impl From<ProcessError> for HookError {
    fn from(error: ProcessError) -> Self {
        HookError::Process(Box::new(error))
    }
}
