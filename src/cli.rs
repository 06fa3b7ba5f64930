// CLI interface for snp-pylint using clap
use clap::Parser;
use std::path::PathBuf;

use crate::config::HookConfig;
use crate::error::{CliError, HookError, Result};
use crate::hook::PylintHook;
use crate::logging::{init_logging, LogConfig};
use crate::process::ProcessManager;

#[derive(Parser, Debug)]
#[command(
    name = "snp-pylint",
    about = "Run pylint from a virtualenv cached by the hash of your requirements file",
    version = crate::VERSION,
    long_about = "snp-pylint is a pre-commit hook that builds a virtualenv next to the active one, keyed by the SHA-1 of the requirements file, installs the requirements into it once, and runs pylint from it on the given files."
)]
pub struct Cli {
    /// Location of requirements.txt file
    #[arg(long, value_name = "PATH", default_value = crate::config::DEFAULT_REQUIREMENTS)]
    pub requirements: PathBuf,

    /// Linter executable to run inside the virtualenv
    #[arg(long, env = "SNP_PYLINT_LINTER", default_value = crate::config::DEFAULT_LINTER)]
    pub linter: String,

    /// Interpreter used to create the virtualenv (defaults to the active one)
    #[arg(long, env = "SNP_PYLINT_PYTHON", value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Control color output (auto, always, never)
    #[arg(long, value_name = "WHEN")]
    pub color: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, value_name = "FORMAT", value_parser = ["pretty", "compact", "json"])]
    pub log_format: Option<String>,

    /// Files to lint
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn run(&self) -> Result<i32> {
        self.init_logging();

        if self.verbose && self.quiet {
            return Err(HookError::Cli(Box::new(CliError::ConflictingArguments {
                first: "--verbose".to_string(),
                second: "--quiet".to_string(),
                suggestion: "Use either --verbose for more output or --quiet for less output, but not both".to_string(),
            })));
        }

        let config = HookConfig::from_cli(self);
        PylintHook::new(config, ProcessManager::new()).run()
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_cli(self.verbose, self.quiet, self.color.clone())
            .with_format_name(self.log_format.as_deref())
    }

    pub fn use_colors(&self) -> bool {
        self.log_config().should_use_colors()
    }

    fn init_logging(&self) {
        if let Err(e) = init_logging(self.log_config()) {
            eprintln!("Failed to initialize logging: {e}");
            // Continue execution even if logging fails
        }
    }
}
