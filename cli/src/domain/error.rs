//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`. All error types
//! implement `thiserror::Error` and convert to `anyhow::Error` via `?`.

use std::path::PathBuf;

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Resource and prerequisite failures. Every variant aborts the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Insufficient disk space: {available_gb} GB free on /, need {required_gb} GB.")]
    InsufficientDiskSpace { available_gb: u64, required_gb: u64 },

    #[error("Insufficient memory: {available_mb} MB installed, need {required_mb} MB.")]
    InsufficientMemory { available_mb: u64, required_mb: u64 },

    #[error("Required file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid format for {key}: expected at least 20 characters of [A-Za-z0-9_-].")]
    InvalidSecretFormat { key: String },

    #[error("kiosk-setup must be run as root. Retry with: sudo kiosk-setup")]
    NotRoot,
}

// ── Retry / wait errors ───────────────────────────────────────────────────────

/// Network fetch failures.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download of {url} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// A systemd unit did not report `active` within the allowed time.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Service '{service}' did not become active within {timeout_secs}s.")]
pub struct ServiceTimeout {
    pub service: String,
    pub timeout_secs: u64,
}

// ── Step errors ───────────────────────────────────────────────────────────────

/// A fatal step failed and the run was aborted.
///
/// The cause is kept as an `anyhow::Error` so typed causes
/// (`ValidationError`, `ServiceTimeout`, ...) stay reachable through
/// [`StepError::cause`] and `downcast_ref`.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Step '{step}' failed: {cause:#}")]
    Fatal {
        step: &'static str,
        cause: anyhow::Error,
    },
}

impl StepError {
    /// Name of the step that aborted the run.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::Fatal { step, .. } => step,
        }
    }

    /// Underlying failure reported by the step.
    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            Self::Fatal { cause, .. } => cause,
        }
    }
}

// ── Artifact errors ───────────────────────────────────────────────────────────

/// Artifact rendering and persistence failures.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Unknown template '{0}'.")]
    UnknownTemplate(String),

    #[error("Template '{template}' references unbound variable '{name}'.")]
    UnboundVariable { template: String, name: String },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Verification errors ───────────────────────────────────────────────────────

/// Hard post-install verification failures.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Application container is not running.\n\nRecent logs:\n{logs}")]
    ContainerNotRunning { logs: String },

    #[error("Kernel log reports filesystem errors today:\n{}", .entries.join("\n"))]
    FilesystemErrors { entries: Vec<String> },
}
