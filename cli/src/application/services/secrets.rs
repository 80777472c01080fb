//! Application service — credential collection and app config preparation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, SecretPrompt};
use crate::domain::secret::{self, ENV_FILE, ENV_TEMPLATE, Secret, SecretSpec};
use crate::domain::verify::base_url_from_config;

/// Mode for files holding credentials.
pub const SECRET_FILE_MODE: u32 = 0o600;

/// Mode for ordinary generated files.
pub const PUBLIC_FILE_MODE: u32 = 0o644;

/// App config template shipped with the project.
pub const CONFIG_EXAMPLE: &str = "config.example.json";

/// App config read by the container.
pub const CONFIG_FILE: &str = "config.json";

/// How the env-file step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileOutcome {
    /// `.env` already existed; nothing was prompted or written.
    AlreadyPresent,
    /// `.env` was rendered from the template.
    Created,
}

/// Collect API keys and write `.env`.
///
/// A no-op when `.env` already exists. Otherwise every key is prompted for
/// and validated before anything is written, so an invalid key leaves no
/// file behind.
///
/// # Errors
///
/// Returns `InvalidSecretFormat` for a malformed key, or an error if the
/// template cannot be read or the env file cannot be written.
pub fn collect_secrets(
    fs: &impl LocalFs,
    prompt: &impl SecretPrompt,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
    specs: &[SecretSpec],
) -> Result<EnvFileOutcome> {
    let env_path = project_dir.join(ENV_FILE);
    if fs.exists(&env_path) {
        reporter.success(&format!("{} already present, keeping existing keys", env_path.display()));
        return Ok(EnvFileOutcome::AlreadyPresent);
    }

    let mut secrets = Vec::with_capacity(specs.len());
    for spec in specs {
        let raw = prompt
            .prompt_secret(spec.prompt)
            .with_context(|| format!("reading {}", spec.key))?;
        secrets.push(Secret::parse(spec.key, &raw)?);
    }

    let template_path = project_dir.join(ENV_TEMPLATE);
    let template = fs
        .read_to_string(&template_path)
        .with_context(|| format!("reading {}", template_path.display()))?;
    let rendered = secret::render_env_file(&template, specs, &secrets);

    fs.write_atomic(&env_path, &rendered, SECRET_FILE_MODE)
        .with_context(|| format!("writing {}", env_path.display()))?;
    tracing::info!(path = %env_path.display(), keys = secrets.len(), "env file written");
    Ok(EnvFileOutcome::Created)
}

/// Ensure `config.json` exists and return the application's base URL.
///
/// Copies `config.example.json` when `config.json` is absent. The base URL
/// is the config's `base_url`, else `default_url`.
///
/// # Errors
///
/// Returns an error if the example cannot be copied or the config read.
pub fn prepare_config(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
    default_url: &str,
) -> Result<String> {
    let config_path = project_dir.join(CONFIG_FILE);
    if !fs.exists(&config_path) {
        let example = project_dir.join(CONFIG_EXAMPLE);
        fs.copy_new(&example, &config_path)
            .with_context(|| format!("copying {} to {}", example.display(), config_path.display()))?;
        reporter.success(&format!("created {}", config_path.display()));
    }

    let content = fs
        .read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    Ok(base_url_from_config(&content).unwrap_or_else(|| default_url.to_string()))
}
