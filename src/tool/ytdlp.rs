//! Thin async wrapper around the `yt-dlp` executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument, trace, warn};

use super::ToolError;

/// Program name looked up on `PATH` when no explicit location is configured.
pub const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Output template for audio downloads, relative to the target directory.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Handle to the external media tool.
///
/// Holds only the program location; every call spawns a fresh process with
/// stdin closed and both output streams captured.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Uses `yt-dlp` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Uses the given executable instead of the `PATH` lookup.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the configured program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Runs the tool to completion and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Spawn`] when the program cannot be started and
    /// [`ToolError::ExitStatus`] when it exits unsuccessfully.
    #[instrument(skip(self), fields(program = %self.program.display()))]
    pub async fn capture(&self, args: &[&str]) -> Result<String, ToolError> {
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| ToolError::spawn(&self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::exit_status(
                &self.program,
                output.status.code(),
                &stderr,
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = stdout.len(), "tool output captured");
        Ok(stdout)
    }

    /// Runs the tool and hands each stdout line to `on_line` as it arrives.
    ///
    /// Returns the number of lines seen. A non-zero exit after some output is
    /// tolerated (the tool reports per-entry failures that way when asked to
    /// ignore errors); a non-zero exit with no output is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the program cannot be started, its output
    /// cannot be read, or it fails without producing any line.
    #[instrument(skip(self, on_line), fields(program = %self.program.display()))]
    pub async fn stream_lines<F>(&self, args: &[&str], mut on_line: F) -> Result<usize, ToolError>
    where
        F: FnMut(&str) + Send,
    {
        let mut child = self
            .command(args)
            .spawn()
            .map_err(|e| ToolError::spawn(&self.program, e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ToolError::io(&self.program, std::io::Error::other("stdout not captured"))
        })?;
        let stderr = child.stderr.take();

        // Drain stderr concurrently so a chatty tool never blocks on a full pipe.
        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut text).await;
            }
            text
        });

        let mut reader = BufReader::new(stdout).lines();
        let mut count = 0usize;
        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|e| ToolError::io(&self.program, e))?
        {
            count += 1;
            trace!(line_no = count, "tool line");
            on_line(&line);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ToolError::io(&self.program, e))?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            if count == 0 {
                return Err(ToolError::exit_status(
                    &self.program,
                    status.code(),
                    &stderr_text,
                ));
            }
            warn!(
                code = status.code(),
                lines = count,
                "tool exited unsuccessfully after partial output"
            );
        }

        Ok(count)
    }

    /// Downloads the best available audio stream for `url` into `dir`.
    ///
    /// Returns the path of the file the tool wrote, as it reports it after
    /// post-processing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tool fails or does not report a file.
    #[instrument(skip(self), fields(program = %self.program.display(), dir = %dir.display()))]
    pub async fn download_audio(&self, url: &str, dir: &Path) -> Result<PathBuf, ToolError> {
        let template = dir.join(OUTPUT_TEMPLATE);
        let template = template.to_string_lossy();
        let args = [
            "-f",
            "bestaudio/best",
            "--no-playlist",
            "--no-progress",
            "--no-simulate",
            "--print",
            "after_move:filepath",
            "-o",
            template.as_ref(),
            url,
        ];

        let stdout = self.capture(&args).await?;
        let path = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ToolError::missing_output(&self.program, url))?;

        debug!(path = %path.display(), "tool download finished");
        Ok(path)
    }
}
