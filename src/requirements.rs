// Requirements manifest reading
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, HookError, Result};

/// Ordered lines of a requirements manifest, each kept with its line terminator.
///
/// The exact text matters: it is what the cache key is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Requirements {
    lines: Vec<String>,
    source: Option<PathBuf>,
}

impl Requirements {
    /// Read a manifest from disk
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HookError::from(ConfigError::ManifestNotFound {
                    path: path.to_path_buf(),
                    suggestion: Some(
                        "Pass --requirements <path> or create requirements.txt".to_string(),
                    ),
                })
            } else {
                HookError::from(ConfigError::ManifestUnreadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        })?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..Self::parse(&content)
        })
    }

    /// Split manifest text into lines, keeping terminators.
    ///
    /// `\r\n` and lone `\r` terminators are read as `\n`.
    pub fn parse(content: &str) -> Self {
        let content = content.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
            source: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// File the lines were read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with comments stripped, trimmed, blanks dropped
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|line| strip_comment(line).trim())
            .filter(|entry| !entry.is_empty())
    }

    /// Arguments for `pip install`.
    ///
    /// A manifest read from disk is handed to pip with `-r`, so pip applies
    /// its own requirements-file syntax (per-line `--hash`, continuations,
    /// nested `-r` relative to the manifest). In-memory text is converted
    /// line by line instead. Empty when there is nothing to install.
    pub fn install_args(&self) -> Vec<OsString> {
        if self.entries().next().is_none() {
            return Vec::new();
        }
        match &self.source {
            Some(path) => vec![OsString::from("-r"), path.clone().into_os_string()],
            None => self
                .entries()
                .flat_map(entry_args)
                .map(OsString::from)
                .collect(),
        }
    }
}

/// Drop a `#` comment that starts the line or follows whitespace
fn strip_comment(line: &str) -> &str {
    let mut previous_is_space = true;
    for (i, c) in line.char_indices() {
        if c == '#' && previous_is_space {
            return &line[..i];
        }
        previous_is_space = c.is_whitespace();
    }
    line
}

/// Option lines split on whitespace; a specifier stays one argument up to
/// the first option token, and the options after it become separate args
fn entry_args(entry: &str) -> Vec<String> {
    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let split = tokens
        .iter()
        .position(|token| token.starts_with('-'))
        .unwrap_or(tokens.len());
    let mut args = Vec::with_capacity(tokens.len() - split + 1);
    if split > 0 {
        args.push(tokens[..split].join(" "));
    }
    args.extend(tokens[split..].iter().map(|token| token.to_string()));
    args
}
