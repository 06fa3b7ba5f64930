// snp-pylint - pre-commit hook running pylint from a requirements-keyed virtualenv cache

pub mod cache;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod hook;
pub mod logging;
pub mod process;
pub mod provision;
pub mod requirements;
pub mod runner;

// Re-export main types for easier access
pub use cache::{CacheKey, EnvironmentCache};
pub use config::HookConfig;
pub use environment::{with_activated, VenvActivation};
pub use error::{exit_codes, CliError, ConfigError, HookError, ProcessError, Result};
pub use hook::PylintHook;
pub use logging::{ColorConfig, LogConfig, LogFormat};
pub use process::{CommandRunner, ProcessConfig, ProcessManager, ProcessResult};
pub use provision::Provisioner;
pub use requirements::Requirements;
pub use runner::LintRunner;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// Build information (set by build script)
pub const BUILD_DATE: &str = env!("BUILD_DATE");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Get formatted version string with build information
pub fn version_info() -> String {
    format!("{NAME} {VERSION} (commit: {GIT_COMMIT}, built: {BUILD_DATE})")
}
