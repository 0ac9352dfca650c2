//! External downloader invocation
//!
//! The downloader is an opaque executable. [`DownloadCommand`] is the seam
//! the driver talks to; [`YtDlp`] is the real implementation.

use crate::config::DownloadConfig;
use std::future::Future;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Errors raised when the downloader cannot be run at all
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// How a finished downloader process exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code; None if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExitInfo {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Text to show the operator for a failed run
    ///
    /// Trimmed stderr, or trimmed stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        let text = if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        };

        if text.is_empty() {
            match self.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            }
        } else {
            text.to_string()
        }
    }
}

impl From<std::process::Output> for ExitInfo {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Something that can download one item
pub trait DownloadCommand {
    /// Downloads `url`, writing to `output_template`
    ///
    /// # Returns
    ///
    /// * `Ok(ExitInfo)` - The command ran; check [`ExitInfo::success`]
    /// * `Err(DownloadError)` - The command could not be started
    fn execute(
        &self,
        url: &str,
        output_template: &str,
    ) -> impl Future<Output = Result<ExitInfo, DownloadError>> + Send;
}

/// The `yt-dlp` command line downloader
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    format: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            format: format.into(),
        }
    }

    pub fn from_config(config: &DownloadConfig) -> Self {
        Self::new(&config.program, &config.format)
    }

    /// Arguments passed for one item, after the program name
    pub fn args<'a>(&'a self, url: &'a str, output_template: &'a str) -> [&'a str; 5] {
        ["--format", self.format.as_str(), "-o", output_template, url]
    }
}

impl DownloadCommand for YtDlp {
    async fn execute(&self, url: &str, output_template: &str) -> Result<ExitInfo, DownloadError> {
        tracing::debug!("Running {} {:?}", self.program, self.args(url, output_template));

        let output = Command::new(&self.program)
            .args(self.args(url, output_template))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(output.into())
    }
}
