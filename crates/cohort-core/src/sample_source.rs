//! Genotype sample ID sources.
//!
//! The harmonizer needs the set of sample IDs present in the genotype data.
//! Those come from a user-supplied list file or from running an external
//! listing tool (`bcftools query -l <vcf>` by default) against the genotype
//! source. Both sit behind [`SampleSource`] so the reconciliation logic can
//! be exercised with in-memory sets.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use cohort_ingest::read_sample_ids;
use cohort_model::IdentifierSet;

use crate::error::{CohortError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Supplies the genotype sample IDs for one run.
pub trait SampleSource {
    /// Short description for logs and diagnostics.
    fn describe(&self) -> String;

    /// Fetches the sample IDs. Called exactly once per run.
    fn sample_ids(&self) -> Result<IdentifierSet>;
}

/// An in-memory set acts as its own source.
impl SampleSource for IdentifierSet {
    fn describe(&self) -> String {
        format!("{} in-memory sample ids", self.len())
    }

    fn sample_ids(&self) -> Result<IdentifierSet> {
        Ok(self.clone())
    }
}

/// Newline-delimited sample ID file.
#[derive(Debug, Clone)]
pub struct SampleIdFile {
    path: PathBuf,
}

impl SampleIdFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for SampleIdFile {
    fn describe(&self) -> String {
        format!("sample id file {}", self.path.display())
    }

    fn sample_ids(&self) -> Result<IdentifierSet> {
        Ok(read_sample_ids(&self.path)?)
    }
}

/// External tool that prints one sample ID per line on stdout.
#[derive(Debug, Clone)]
pub struct SampleListCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SampleListCommand {
    pub const DEFAULT_PROGRAM: &'static str = "bcftools";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// `<program> query -l <genotypes>`, the bcftools sample listing.
    pub fn bcftools_query(program: impl Into<String>, genotypes: &Path) -> Self {
        Self::new(
            program,
            vec![
                "query".to_string(),
                "-l".to_string(),
                genotypes.display().to_string(),
            ],
        )
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn failure(&self, reason: impl Into<String>) -> CohortError {
        CohortError::ExternalTool {
            command: self.command_line(),
            reason: reason.into(),
        }
    }

    /// Runs the tool to completion and returns its stdout.
    fn run(&self) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {e}")))?;

        // Drain both pipes off-thread so a full pipe cannot stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status: ExitStatus = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    warn!(
                        command = %self.command_line(),
                        timeout_secs = self.timeout.as_secs_f64(),
                        "sample listing timed out, killing it"
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.failure(format!(
                        "timed out after {:.1}s",
                        self.timeout.as_secs_f64()
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(self.failure(format!("failed to wait: {e}"))),
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        debug!(
            command = %self.command_line(),
            status = %status,
            stdout_bytes = stdout.len(),
            duration_ms = started.elapsed().as_millis(),
            "sample listing finished"
        );

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let detail = stderr.trim();
            return Err(self.failure(if detail.is_empty() {
                format!("exited with {status}")
            } else {
                format!("exited with {status}: {detail}")
            }));
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl SampleSource for SampleListCommand {
    fn describe(&self) -> String {
        format!("`{}`", self.command_line())
    }

    fn sample_ids(&self) -> Result<IdentifierSet> {
        info!(command = %self.command_line(), "listing genotype samples");
        let output = self.run()?;
        Ok(IdentifierSet::from_lines(&output))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}
