// Virtualenv provisioning on a cache miss: create the venv, then pip install into it.
//
// A failure leaves whatever was created in place; the next run sees the
// directory and treats it as a hit.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::environment::with_activated;
use crate::error::Result;
use crate::process::{CommandRunner, ProcessConfig};
use crate::requirements::Requirements;

pub struct Provisioner<R> {
    runner: R,
    python: PathBuf,
}

impl<R: CommandRunner> Provisioner<R> {
    /// `python` is the interpreter that runs `-m virtualenv`
    pub fn new(runner: R, python: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            python: python.into(),
        }
    }

    pub fn provision(&self, path: &Path, requirements: &Requirements) -> Result<()> {
        info!(path = %path.display(), "Creating virtualenv");
        let create = self.create_command(path);
        self.runner.run(&create)?.check(&create)?;

        let install_args = requirements.install_args();
        if install_args.is_empty() {
            debug!("No requirements to install");
            return Ok(());
        }

        info!(args = install_args.len(), "Installing requirements");
        with_activated(path, || {
            let install = install_command(install_args);
            self.runner.run(&install)?.check(&install).map(|_| ())
        })
    }

    fn create_command(&self, path: &Path) -> ProcessConfig {
        ProcessConfig::new(self.python.to_string_lossy()).with_args([
            OsString::from("-m"),
            OsString::from("virtualenv"),
            path.as_os_str().to_os_string(),
        ])
    }
}

fn install_command(args: Vec<OsString>) -> ProcessConfig {
    ProcessConfig::new("pip")
        .with_args(["install"])
        .with_additional_args(args)
}
