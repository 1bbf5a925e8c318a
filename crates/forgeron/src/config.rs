//! Startup configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors resolving the startup configuration. All of them are fatal for
/// the process; nothing here is reachable from a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured build file does not exist.
    #[error("build file not found: {0}")]
    BuildFileNotFound(String),

    /// The configured build file is not a regular file.
    #[error("build file is not a regular file: {0}")]
    NotAFile(String),

    /// I/O error while resolving the build file path.
    #[error("failed to resolve build file {path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable service configuration, constructed once in `main` and shared
/// read-only (behind an `Arc`) by every connection task.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path to the build file driving every build. Resolved once
    /// at startup, independent of any request workspace.
    pub build_file: PathBuf,
    /// Explicit output patterns, in CLI order.
    pub output_patterns: Vec<String>,
    /// Optional bound on one build invocation. `None` leaves builds
    /// unbounded.
    pub build_timeout: Option<Duration>,
}

impl Config {
    /// Build the configuration, resolving `build_file` to an absolute path
    /// and verifying that it names an existing regular file.
    pub fn new(
        build_file: &Path,
        output_patterns: Vec<String>,
        build_timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let shown = build_file.display().to_string();

        if !build_file.exists() {
            return Err(ConfigError::BuildFileNotFound(shown));
        }

        let build_file = build_file.canonicalize().map_err(|source| ConfigError::Resolve {
            path: shown.clone(),
            source,
        })?;

        if !build_file.is_file() {
            return Err(ConfigError::NotAFile(shown));
        }

        Ok(Self {
            build_file,
            output_patterns,
            build_timeout,
        })
    }
}
