//! Host prerequisite checks — pure functions over collected host facts.

use std::path::Path;

use crate::domain::error::ValidationError;

/// Minimum installed memory in MB.
pub const MIN_MEMORY_MB: u64 = 4000;

/// Substring expected in `/proc/device-tree/model` on the target board.
pub const TARGET_PLATFORM: &str = "Raspberry Pi";

/// Input files the project checkout must provide, in check order.
pub const REQUIRED_FILES: &[&str] = &[
    ".env.template",
    "config.example.json",
    "Dockerfile",
    "requirements.txt",
];

/// Disk thresholds applied at different points of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskStage {
    PreInstall,
    PreBuild,
    PostInstall,
}

impl DiskStage {
    /// Free GB required on `/` at this stage.
    #[must_use]
    pub fn required_gb(self) -> u64 {
        match self {
            Self::PreInstall => 10,
            Self::PreBuild => 5,
            Self::PostInstall => 3,
        }
    }
}

/// Facts gathered about the host before validation.
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    /// Contents of the device-tree model string, if the host exposes one.
    pub device_model: Option<String>,
    /// Free space on the root filesystem in KiB.
    pub free_disk_kb: u64,
    /// Total installed memory in MB.
    pub total_memory_mb: u64,
}

impl HostInfo {
    /// Free space in whole gigabytes (floor).
    #[must_use]
    pub fn free_disk_gb(&self) -> u64 {
        self.free_disk_kb / (1024 * 1024)
    }
}

/// Soft finding that is reported but never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightWarning {
    UnknownPlatform { model: Option<String> },
}

impl std::fmt::Display for PreflightWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPlatform { model: Some(m) } => {
                write!(f, "host identifies as '{m}', not a {TARGET_PLATFORM}")
            }
            Self::UnknownPlatform { model: None } => {
                write!(f, "host does not report a device model; expected a {TARGET_PLATFORM}")
            }
        }
    }
}

/// Soft platform identity check.
#[must_use]
pub fn check_platform(host: &HostInfo) -> Option<PreflightWarning> {
    let is_target = host
        .device_model
        .as_deref()
        .is_some_and(|m| m.contains(TARGET_PLATFORM));
    (!is_target).then(|| PreflightWarning::UnknownPlatform {
        model: host
            .device_model
            .as_deref()
            .map(|m| m.trim_end_matches('\0').trim().to_string()),
    })
}

/// Hard disk check against a whole-GB threshold.
///
/// # Errors
///
/// Returns `InsufficientDiskSpace` when the floored free space is below
/// `required_gb`.
pub fn check_disk(host: &HostInfo, required_gb: u64) -> Result<(), ValidationError> {
    let available_gb = host.free_disk_gb();
    if available_gb < required_gb {
        return Err(ValidationError::InsufficientDiskSpace {
            available_gb,
            required_gb,
        });
    }
    Ok(())
}

/// Hard memory check against [`MIN_MEMORY_MB`].
///
/// # Errors
///
/// Returns `InsufficientMemory` when total memory is below the minimum.
pub fn check_memory(host: &HostInfo) -> Result<(), ValidationError> {
    if host.total_memory_mb < MIN_MEMORY_MB {
        return Err(ValidationError::InsufficientMemory {
            available_mb: host.total_memory_mb,
            required_mb: MIN_MEMORY_MB,
        });
    }
    Ok(())
}

/// Hard check that every required input exists under `root`.
///
/// # Errors
///
/// Returns `MissingFile` naming the first absent file.
pub fn check_required_files(
    root: &Path,
    files: &[&str],
    exists: impl Fn(&Path) -> bool,
) -> Result<(), ValidationError> {
    match files.iter().map(|f| root.join(f)).find(|p| !exists(p)) {
        Some(missing) => Err(ValidationError::MissingFile(missing)),
        None => Ok(()),
    }
}

/// Run the pre-install checks: platform (soft), disk, memory (hard).
///
/// # Errors
///
/// Returns the first hard failure.
pub fn validate(host: &HostInfo, required_gb: u64) -> Result<Vec<PreflightWarning>, ValidationError> {
    let warnings: Vec<_> = check_platform(host).into_iter().collect();
    check_disk(host, required_gb)?;
    check_memory(host)?;
    Ok(warnings)
}
