//! Error types for the external media tool.

use std::path::PathBuf;

use thiserror::Error;

/// Longest stderr excerpt kept in an error message.
const MAX_STDERR_EXCERPT: usize = 400;

/// Errors from running the external media tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be started at all.
    #[error(
        "could not start {program}: {source}\n  Suggestion: install yt-dlp or pass its location with --yt-dlp"
    )]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure.
    #[error("{program} exited with status {code}: {stderr}")]
    ExitStatus {
        /// Program that failed.
        program: PathBuf,
        /// Exit code, or -1 when killed by a signal.
        code: i32,
        /// Trailing stderr text.
        stderr: String,
    },

    /// Reading the tool's output failed.
    #[error("IO error talking to {program}: {source}")]
    Io {
        /// Program being read from.
        program: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tool succeeded but did not report the file it wrote.
    #[error("{program} finished without reporting an output file for {url}")]
    MissingOutput {
        /// Program that ran.
        program: PathBuf,
        /// URL that was downloaded.
        url: String,
    },
}

impl ToolError {
    /// Creates a spawn error.
    pub fn spawn(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates an exit-status error, keeping only the tail of stderr.
    pub fn exit_status(program: impl Into<PathBuf>, code: Option<i32>, stderr: &str) -> Self {
        Self::ExitStatus {
            program: program.into(),
            code: code.unwrap_or(-1),
            stderr: stderr_excerpt(stderr),
        }
    }

    /// Creates an IO error.
    pub fn io(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            program: program.into(),
            source,
        }
    }

    /// Creates a missing-output error.
    pub fn missing_output(program: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self::MissingOutput {
            program: program.into(),
            url: url.into(),
        }
    }
}

fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return "(no error output)".to_string();
    }
    let chars = trimmed.chars().count();
    if chars <= MAX_STDERR_EXCERPT {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(chars - MAX_STDERR_EXCERPT).collect();
    format!("...{tail}")
}
