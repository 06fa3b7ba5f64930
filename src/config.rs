// Resolved runtime settings for a hook run
use std::path::PathBuf;

use crate::cache::DEFAULT_CACHE_SUBDIR;
use crate::cli::Cli;

pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
pub const DEFAULT_LINTER: &str = "pylint";

#[derive(Debug, Clone, PartialEq)]
pub struct HookConfig {
    /// Manifest the environment is built from
    pub requirements: PathBuf,
    /// Files forwarded verbatim to the linter
    pub files: Vec<PathBuf>,
    /// Linter executable, resolved through the activated `PATH`
    pub linter: String,
    /// Interpreter that runs `virtualenv`; defaults to the active venv's
    pub python: Option<PathBuf>,
    pub cache_subdir: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from(DEFAULT_REQUIREMENTS),
            files: Vec::new(),
            linter: DEFAULT_LINTER.to_string(),
            python: None,
            cache_subdir: DEFAULT_CACHE_SUBDIR.to_string(),
        }
    }
}

impl HookConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            requirements: cli.requirements.clone(),
            files: cli.files.clone(),
            linter: cli.linter.clone(),
            python: cli.python.clone(),
            ..Self::default()
        }
    }

    pub fn with_requirements(mut self, path: impl Into<PathBuf>) -> Self {
        self.requirements = path.into();
        self
    }

    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_linter(mut self, linter: impl Into<String>) -> Self {
        self.linter = linter.into();
        self
    }

    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = Some(python.into());
        self
    }

    pub fn with_cache_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.cache_subdir = subdir.into();
        self
    }
}
