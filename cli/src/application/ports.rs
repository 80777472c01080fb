//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::output`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::{ArtifactError, HostInfo, RetryPolicy};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Explicit execution context for an external command.
///
/// Replaces ambient process state: every command gets its working
/// directory and extra environment from here, never from a prior `cd`
/// or `export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
}

impl ExecContext {
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
        }
    }

    /// Add one environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, ctx: &ExecContext, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;

    /// Run a program with inherited stdio and return only its exit status.
    /// No timeout — used for long package installs and image builds.
    async fn run_status(&self, ctx: &ExecContext, program: &str, args: &[&str])
    -> Result<ExitStatus>;
}

// ── Host Port ─────────────────────────────────────────────────────────────────

/// Abstracts host introspection for the preflight checks.
#[allow(async_fn_in_trait)]
pub trait HostProbe {
    /// Gather disk, memory and platform facts.
    async fn host_info(&self) -> Result<HostInfo>;

    /// Whether the current process runs with root privileges.
    async fn is_root(&self) -> Result<bool>;

    /// Resolve `name` against `PATH`.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

// ── Network Ports ─────────────────────────────────────────────────────────────

/// A single, time-bounded download attempt.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch `url` into `dest`, honouring the policy's connect and attempt
    /// timeouts. Makes exactly one attempt.
    async fn fetch(&self, url: &str, dest: &Path, policy: &RetryPolicy) -> Result<()>;
}

/// Abstracts HTTP status probes (health endpoint, API key checks).
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// Issue a GET and return the response status code.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn get_status(&self, url: &str, bearer: Option<&str>) -> Result<u16>;
}

// ── Interactive Input Port ────────────────────────────────────────────────────

/// Reads credentials from the controlling terminal.
pub trait SecretPrompt {
    /// Prompt with `label` and return the raw input.
    fn prompt_secret(&self, label: &str) -> Result<String>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a step that blocks silently for a while. The next event ends it.
    fn wait(&self, message: &str) {
        self.step(message);
    }
}

// ── Filesystem and Template Ports ─────────────────────────────────────────────

/// Abstracts local filesystem operations.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Write via a temp file in the same directory, then rename over `path`.
    fn write_atomic(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
    /// Copy `from` to `to`, failing if `to` already exists.
    fn copy_new(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Abstracts access to the embedded artifact templates.
pub trait TemplateSource {
    /// Raw text of template `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` when no template has that name.
    fn template(&self, name: &str) -> Result<&'static str, ArtifactError>;
}
