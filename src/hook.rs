// The pylint hook: manifest -> cache key -> cached venv (provisioned on miss) -> lint run
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cache::{active_environment, CacheKey, EnvironmentCache};
use crate::config::HookConfig;
use crate::environment::{python_executable, with_activated};
use crate::error::Result;
use crate::process::CommandRunner;
use crate::provision::Provisioner;
use crate::requirements::Requirements;
use crate::runner::LintRunner;

pub struct PylintHook<R> {
    config: HookConfig,
    runner: R,
}

impl<R: CommandRunner> PylintHook<R> {
    pub fn new(config: HookConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Run the hook and return the exit code to propagate.
    ///
    /// Provisioning failures come back as errors carrying the failing
    /// command's exit code; lint findings come back as `Ok(code)`.
    pub fn run(&self) -> Result<i32> {
        // Must fail before touching the filesystem or spawning anything
        let active_venv = active_environment()?;
        let cache =
            EnvironmentCache::for_venv(&active_venv)?.with_subdir(&self.config.cache_subdir);

        let requirements = Requirements::read(&self.config.requirements)?;
        let key = CacheKey::from_requirements(&requirements);
        let venv = cache.locate(&key);
        debug!(key = %key, venv = %venv.display(), "Resolved lint environment");

        if cache.exists(&venv) {
            debug!("Using cached virtualenv");
        } else {
            info!(venv = %venv.display(), "No cached virtualenv, provisioning");
            let python = self.interpreter(&active_venv);
            Provisioner::new(&self.runner, python).provision(&venv, &requirements)?;
        }

        with_activated(&venv, || {
            LintRunner::new(&self.runner, &self.config.linter).run(&self.config.files)
        })
    }

    fn interpreter(&self, active_venv: &Path) -> PathBuf {
        self.config
            .python
            .clone()
            .unwrap_or_else(|| python_executable(active_venv))
    }
}
