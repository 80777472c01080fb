//! Terminal stylesheet for provisioning output.

use owo_colors::Style;

/// One style per kind of line the provisioner prints.
///
/// `Styles::default()` is plain text; [`Styles::colored`] is used on a TTY.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    /// `✓` marker of a finished step.
    pub ok: Style,
    /// `⚠` marker of a soft failure.
    pub warn: Style,
    /// `✗` marker of the aborting error.
    pub fail: Style,
    /// `→` marker of a running step.
    pub running: Style,
    /// Summary keys.
    pub label: Style,
    /// Run banner and summary title.
    pub title: Style,
}

impl Styles {
    #[must_use]
    pub fn colored() -> Self {
        Self {
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
            running: Style::new().cyan(),
            label: Style::new().dimmed(),
            title: Style::new().bold().cyan(),
        }
    }
}
