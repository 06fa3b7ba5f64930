// Requirements-keyed cache of provisioned virtual environments.
//
// Layout: <parent of $VIRTUAL_ENV>/pylint_venvs/<sha1 of requirements>/
// A directory that exists is a hit. Entries are never validated or evicted.

use sha1::{Digest, Sha1};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, HookError, Result};
use crate::requirements::Requirements;

/// Variable naming the currently active virtual environment
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// Directory under the cache root holding one virtualenv per cache key
pub const DEFAULT_CACHE_SUBDIR: &str = "pylint_venvs";

/// Hex SHA-1 digest of the requirement lines joined by `\n`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_requirements(requirements: &Requirements) -> Self {
        Self::from_lines(requirements.lines())
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut hasher = Sha1::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(line.as_ref().as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps cache keys to virtualenv directories under a cache root
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentCache {
    root: PathBuf,
    subdir: String,
}

impl EnvironmentCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subdir: DEFAULT_CACHE_SUBDIR.to_string(),
        }
    }

    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = subdir.into();
        self
    }

    /// Cache rooted at the parent directory of the active virtualenv
    pub fn from_env() -> Result<Self> {
        Self::for_venv(&active_environment()?)
    }

    /// Cache rooted at the parent directory of `venv`
    pub fn for_venv(venv: &Path) -> Result<Self> {
        let root = cache_root_for(venv)?;
        debug!(venv = %venv.display(), root = %root.display(), "Resolved cache root");
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the environment for `key`; pure path construction
    pub fn locate(&self, key: &CacheKey) -> PathBuf {
        self.root.join(&self.subdir).join(key.as_str())
    }

    /// Existence is the only cache-hit signal
    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// The active virtualenv directory from `VIRTUAL_ENV`
pub fn active_environment() -> Result<PathBuf> {
    match std::env::var_os(VIRTUAL_ENV_VAR) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(HookError::from(ConfigError::NoActiveEnvironment {
            variable: VIRTUAL_ENV_VAR.to_string(),
            suggestion: Some("Run the hook from inside an activated virtualenv".to_string()),
        })),
    }
}

/// Absolute, lexically normalised parent of `venv`
pub fn cache_root_for(venv: &Path) -> Result<PathBuf> {
    let absolute = if venv.is_absolute() {
        venv.to_path_buf()
    } else {
        std::env::current_dir()?.join(venv)
    };
    Ok(normalize(&absolute.join(Component::ParentDir.as_os_str())))
}

fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    let mut normalized = PathBuf::new();
    for part in parts {
        normalized.push(part.as_os_str());
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
