//! Terminal credential prompt — implements `SecretPrompt` with `dialoguer`.

use anyhow::{Context, Result};
use dialoguer::Password;

use crate::application::ports::SecretPrompt;

/// Reads hidden input from the controlling terminal.
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&self, label: &str) -> Result<String> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .with_context(|| format!("reading '{label}' from terminal"))
    }
}
