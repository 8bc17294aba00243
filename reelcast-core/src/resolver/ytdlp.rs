//! Local extraction-tool resolver
//!
//! Shells out to a yt-dlp style tool configured to print only the resolved
//! direct URL(s) on stdout. One child process per resolution, no pool: high
//! concurrent load can spawn unbounded children, which is an accepted
//! operational limit.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{ResolveError, Resolver};
use crate::config::YtdlpConfig;
use async_trait::async_trait;

pub struct YtdlpResolver {
    binary: String,
    cookies_file: PathBuf,
    format: String,
    timeout: Duration,
}

impl YtdlpResolver {
    #[must_use]
    pub fn new(config: &YtdlpConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            cookies_file: PathBuf::from(&config.cookies_file),
            format: config.format.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn cookies_path_if_present(&self) -> Option<&Path> {
        self.cookies_file
            .exists()
            .then(|| self.cookies_file.as_path())
    }
}

#[async_trait]
impl Resolver for YtdlpResolver {
    fn name(&self) -> &'static str {
        "ytdlp"
    }

    fn uses_cookies(&self) -> bool {
        self.cookies_file.exists()
    }

    async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-g")
            .arg("--no-playlist")
            .arg("-f")
            .arg(&self.format);

        if let Some(cookies) = self.cookies_path_if_present() {
            command.arg("--cookies").arg(cookies);
        }

        command
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // A missing binary is an installation problem, not an extraction
        // failure; keep the two distinguishable for operators.
        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolveError::ExtractorMissing(self.binary.clone())
            } else {
                ResolveError::ExtractorFailed(format!("failed to spawn {}: {e}", self.binary))
            }
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ResolveError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ResolveError::ExtractorFailed(format!("extractor process failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr);
            tracing::error!(
                binary = %self.binary,
                status = %output.status,
                stderr = %tail,
                "extractor exited with failure"
            );
            return Err(ResolveError::ExtractorFailed(tail));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        first_line(&stdout)
            .map(str::to_string)
            .ok_or(ResolveError::EmptyOutput)
    }
}

/// First non-empty stdout line; the tool may print one URL per stream.
fn first_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Last few meaningful stderr lines, enough to diagnose without dumping
/// the tool's full progress chatter into the error.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(5);
    if lines.is_empty() {
        "extractor exited with a failure status and no stderr".to_string()
    } else {
        lines[start..].join("\n")
    }
}
