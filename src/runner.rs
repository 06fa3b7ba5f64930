// Linter invocation with inherited stdio
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{exit_codes, Result};
use crate::process::{CommandRunner, ProcessConfig};

pub struct LintRunner<R> {
    runner: R,
    linter: String,
}

impl<R: CommandRunner> LintRunner<R> {
    pub fn new(runner: R, linter: impl Into<String>) -> Self {
        Self {
            runner,
            linter: linter.into(),
        }
    }

    /// Run the linter over `files` and return its exit code unchanged.
    ///
    /// Findings (non-zero exit) are not an error here; only a linter that
    /// cannot be executed at all is.
    pub fn run(&self, files: &[PathBuf]) -> Result<i32> {
        let config = ProcessConfig::new(&self.linter)
            .with_args(files)
            .with_capture_output(false);
        debug!(linter = %self.linter, file_count = files.len(), "Running linter");

        let result = self.runner.run(&config)?;
        match result.exit_code() {
            Some(code) => Ok(code),
            None => {
                warn!(linter = %self.linter, "Linter terminated without an exit code");
                Ok(exit_codes::GENERAL_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HookError, ProcessError};
    use crate::process::ProcessResult;
    use std::cell::RefCell;
    use std::time::Duration;

    struct StubRunner {
        exit_code: Option<i32>,
        seen: RefCell<Option<ProcessConfig>>,
    }

    impl StubRunner {
        fn exiting(exit_code: Option<i32>) -> Self {
            Self {
                exit_code,
                seen: RefCell::new(None),
            }
        }
    }

    impl CommandRunner for StubRunner {
        fn run(&self, config: &ProcessConfig) -> Result<ProcessResult> {
            *self.seen.borrow_mut() = Some(config.clone());
            Ok(ProcessResult {
                exit_code: self.exit_code,
                stdout: Vec::new(),
                stderr: Vec::new(),
                duration: Duration::ZERO,
            })
        }
    }

    struct MissingLinter;

    impl CommandRunner for MissingLinter {
        fn run(&self, config: &ProcessConfig) -> Result<ProcessResult> {
            Err(HookError::from(ProcessError::CommandNotFound {
                command: config.command.clone(),
                suggestion: None,
            }))
        }
    }

    #[test]
    fn test_files_forwarded_verbatim_with_inherited_output() {
        let stub = StubRunner::exiting(Some(0));
        let runner = LintRunner::new(&stub, "pylint");

        let code = runner
            .run(&[PathBuf::from("a.py"), PathBuf::from("pkg/b c.py")])
            .unwrap();

        assert_eq!(code, 0);
        let seen = stub.seen.borrow().clone().unwrap();
        assert_eq!(seen.command, "pylint");
        assert_eq!(seen.command_line(), "pylint a.py pkg/b c.py");
        assert!(!seen.capture_output);
    }

    #[test]
    fn test_findings_exit_code_passes_through() {
        let stub = StubRunner::exiting(Some(16));
        let code = LintRunner::new(&stub, "pylint").run(&[]).unwrap();
        assert_eq!(code, 16);
    }

    #[test]
    fn test_signal_termination_maps_to_general_error() {
        let stub = StubRunner::exiting(None);
        let code = LintRunner::new(&stub, "pylint").run(&[]).unwrap();
        assert_eq!(code, exit_codes::GENERAL_ERROR);
    }

    #[test]
    fn test_missing_linter_is_an_error() {
        let err = LintRunner::new(MissingLinter, "pylint").run(&[]).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::PROCESS_ERROR);
    }
}
