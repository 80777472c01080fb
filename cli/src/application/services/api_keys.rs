//! Application service — check collected API keys against their providers.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{HttpProbe, LocalFs, ProgressReporter};
use crate::domain::secret::{ENV_FILE, SecretSpec, env_value};

/// Probe each provider with its key from `.env`.
///
/// Every key is probed even after a failure, so all rejected keys are
/// reported together.
///
/// # Errors
///
/// Returns an error naming each key that is missing or was rejected.
pub async fn validate_api_keys(
    fs: &impl LocalFs,
    http: &impl HttpProbe,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
    specs: &[SecretSpec],
) -> Result<()> {
    let env_path = project_dir.join(ENV_FILE);
    let content = fs
        .read_to_string(&env_path)
        .with_context(|| format!("reading {}", env_path.display()))?;

    let mut rejected = Vec::new();
    for spec in specs {
        let Some(url) = spec.probe_url else { continue };
        let Some(key) = env_value(&content, spec.key).filter(|v| !v.is_empty()) else {
            rejected.push(format!("{} missing from {ENV_FILE}", spec.key));
            continue;
        };
        reporter.wait(&format!("checking {}...", spec.key));
        match http.get_status(url, Some(key)).await {
            Ok(status) if (200..300).contains(&status) => {
                reporter.success(&format!("{} accepted", spec.key));
            }
            Ok(status) => rejected.push(format!("{} rejected (HTTP {status})", spec.key)),
            Err(e) => rejected.push(format!("{} unchecked: {e:#}", spec.key)),
        }
    }

    anyhow::ensure!(rejected.is_empty(), "{}", rejected.join("; "));
    Ok(())
}
