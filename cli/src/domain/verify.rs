//! Post-install verification — pure parsing of tool output.

use std::sync::LazyLock;

use regex::Regex;

/// Kernel log lines that indicate filesystem damage.
pub static FS_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"(?i)(EXT4-fs error|FAT-fs \(.*\): error|I/O error|filesystem error|Remounting filesystem read-only)",
    )
    .expect("valid regex")
});

/// Outcome of the soft HTTP health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    Healthy { status: u16 },
    Unhealthy { reason: String },
}

impl HealthOutcome {
    /// Classify an HTTP status code.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Healthy { status }
        } else {
            Self::Unhealthy {
                reason: format!("HTTP {status}"),
            }
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Outcome of a verification pass that found no hard failure. A stopped
/// container or kernel filesystem errors abort with `VerificationError`
/// instead, so only the health probe result varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub health_url: String,
    pub health: HealthOutcome,
}

/// Returns `true` when `docker compose ps` lists a container that is `Up`.
#[must_use]
pub fn container_is_up(ps_output: &str) -> bool {
    ps_output
        .lines()
        .skip(1)
        .any(|line| line.split_whitespace().any(|word| word == "Up"))
}

/// Kernel log lines matching [`FS_ERROR_RE`].
#[must_use]
pub fn filesystem_errors(kernel_log: &str) -> Vec<String> {
    kernel_log
        .lines()
        .filter(|line| FS_ERROR_RE.is_match(line))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Join a base URL and a path with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Read `base_url` from `config.json` content.
///
/// Returns `None` when the document does not parse, the key is absent,
/// or the value is not a non-empty string.
#[must_use]
pub fn base_url_from_config(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    value
        .get("base_url")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
