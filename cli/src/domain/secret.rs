//! Secret declarations, format validation and env-file rendering.
//!
//! Pure functions only. Prompting and persistence live in
//! `crate::application::services::secrets`.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::error::ValidationError;

/// API keys: at least 20 characters of `[A-Za-z0-9_-]`, nothing else.
pub static SECRET_FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_-]{20,}$").expect("valid regex")
});

/// Env file written next to the compose manifest.
pub const ENV_FILE: &str = ".env";

/// Template the env file is rendered from.
pub const ENV_TEMPLATE: &str = ".env.template";

/// One credential the run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSpec {
    /// Env-file key, e.g. `OPENAI_API_KEY`.
    pub key: &'static str,
    /// Prompt shown on the terminal.
    pub prompt: &'static str,
    /// Literal placeholder in `.env.template` replaced by the value.
    pub placeholder: &'static str,
    /// Authenticated endpoint used to check the key, if any.
    pub probe_url: Option<&'static str>,
}

/// Credentials collected on first boot.
pub const SECRETS: &[SecretSpec] = &[
    SecretSpec {
        key: "OPENAI_API_KEY",
        prompt: "OpenAI API key (image generation)",
        placeholder: "your_openai_api_key_here",
        probe_url: Some("https://api.openai.com/v1/models"),
    },
    SecretSpec {
        key: "LUMA_API_KEY",
        prompt: "Luma AI API key (3D / video generation)",
        placeholder: "your_luma_api_key_here",
        probe_url: Some("https://api.lumalabs.ai/dream-machine/v1/generations?limit=1"),
    },
];

/// A validated secret value. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    pub key: String,
    value: String,
}

impl Secret {
    /// Validate `raw` against [`SECRET_FORMAT_RE`] after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSecretFormat` naming `key` on mismatch.
    pub fn parse(key: &str, raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if !is_valid_secret(value) {
            return Err(ValidationError::InvalidSecretFormat {
                key: key.to_string(),
            });
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Returns `true` when `candidate` matches the API key format exactly.
#[must_use]
pub fn is_valid_secret(candidate: &str) -> bool {
    SECRET_FORMAT_RE.is_match(candidate)
}

/// Render the env file from its template.
///
/// Each spec's placeholder is replaced with the matching secret. A key whose
/// placeholder does not occur in the template is appended as `KEY=value`, so
/// the file always carries every collected secret.
#[must_use]
pub fn render_env_file(template: &str, specs: &[SecretSpec], secrets: &[Secret]) -> String {
    let mut out = template.replace("\r\n", "\n");
    for spec in specs {
        let Some(secret) = secrets.iter().find(|s| s.key == spec.key) else {
            continue;
        };
        if out.contains(spec.placeholder) {
            out = out.replace(spec.placeholder, secret.value());
        } else {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(spec.key);
            out.push('=');
            out.push_str(secret.value());
            out.push('\n');
        }
    }
    out
}

/// Look up `key` in `KEY=value` env-file content.
#[must_use]
pub fn env_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.trim().split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches('"'))
    })
}
