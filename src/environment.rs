// Scoped virtualenv activation over the process environment table.
//
// The overlay is only ever applied through `VenvActivation`; dropping the
// guard puts every variable back exactly as it was, on every exit path.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::VIRTUAL_ENV_VAR;

/// Interpreter-home markers that would point pip/python away from the venv
pub const PYTHON_HOME_VARS: &[&str] = &["PYTHONHOME", "PYTHON_HOME"];
pub const PIP_VERSION_CHECK_VAR: &str = "PIP_DISABLE_PIP_VERSION_CHECK";
pub const PATH_VAR: &str = "PATH";

/// Executable directory of a virtualenv
pub fn bin_dir(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts")
    } else {
        venv.join("bin")
    }
}

/// Interpreter inside a virtualenv
pub fn python_executable(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        bin_dir(venv).join("python.exe")
    } else {
        bin_dir(venv).join("python")
    }
}

fn path_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

/// `PATH` value with the venv's bin directory prepended
pub fn prepend_to_path(venv: &Path, current: Option<&OsStr>) -> OsString {
    let mut path = bin_dir(venv).into_os_string();
    path.push(path_separator());
    if let Some(current) = current {
        path.push(current);
    }
    path
}

/// RAII guard holding a virtualenv activation
#[must_use = "the activation is undone as soon as the guard is dropped"]
#[derive(Debug)]
pub struct VenvActivation {
    venv: PathBuf,
    snapshot: HashMap<OsString, OsString>,
}

impl VenvActivation {
    /// Snapshot the environment, then overlay the activation variables
    pub fn enter(venv: &Path) -> Self {
        let snapshot: HashMap<OsString, OsString> = std::env::vars_os().collect();

        for var in PYTHON_HOME_VARS {
            std::env::remove_var(var);
        }
        std::env::set_var(PIP_VERSION_CHECK_VAR, "1");
        std::env::set_var(VIRTUAL_ENV_VAR, venv);
        let current_path = snapshot.get(OsStr::new(PATH_VAR)).map(OsString::as_os_str);
        std::env::set_var(PATH_VAR, prepend_to_path(venv, current_path));

        debug!(venv = %venv.display(), "Activated virtualenv");
        Self {
            venv: venv.to_path_buf(),
            snapshot,
        }
    }

    pub fn venv(&self) -> &Path {
        &self.venv
    }

    fn restore(&self) {
        let current: Vec<OsString> = std::env::vars_os().map(|(key, _)| key).collect();
        for key in current {
            if !self.snapshot.contains_key(&key) {
                std::env::remove_var(&key);
            }
        }
        for (key, value) in &self.snapshot {
            if std::env::var_os(key).as_ref() != Some(value) {
                std::env::set_var(key, value);
            }
        }
    }
}

impl Drop for VenvActivation {
    fn drop(&mut self) {
        self.restore();
        debug!(venv = %self.venv.display(), "Restored environment");
    }
}

/// Run `f` with `venv` activated
pub fn with_activated<T>(venv: &Path, f: impl FnOnce() -> T) -> T {
    let _activation = VenvActivation::enter(venv);
    f()
}
