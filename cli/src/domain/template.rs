//! `{{NAME}}` placeholder substitution for artifact templates.
//!
//! Pure functions only — no I/O.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::error::ArtifactError;

/// Upper-case `{{NAME}}` placeholders. Shell `${VAR}` syntax is left alone.
pub static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{\{([A-Z][A-Z0-9_]*)\}\}").expect("valid regex")
});

/// Variables available to a template.
pub type Variables = BTreeMap<&'static str, String>;

/// Substitute every placeholder in `text`.
///
/// # Errors
///
/// Returns `UnboundVariable` for the first placeholder with no value.
pub fn render_template(name: &str, text: &str, vars: &Variables) -> Result<String, ArtifactError> {
    if let Some(unbound) = PLACEHOLDER_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .find(|key| !vars.contains_key(key.as_str()))
    {
        return Err(ArtifactError::UnboundVariable {
            template: name.to_string(),
            name: unbound,
        });
    }
    Ok(PLACEHOLDER_RE
        .replace_all(text, |c: &Captures<'_>| vars[&c[1]].clone())
        .replace("\r\n", "\n"))
}
