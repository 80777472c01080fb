//! Terminal output for a provisioning run.
//!
//! Progress lines go to stdout and are silenced by `--quiet`; the aborting
//! error always goes to stderr.

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width summary keys are padded to.
const LABEL_WIDTH: usize = 10;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, and never with `--no-color` or
    /// `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: if use_colors {
                Styles::colored()
            } else {
                Styles::default()
            },
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn line(&self, marker: &str, style: owo_colors::Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", marker.style(style));
        }
    }

    pub fn step(&self, msg: &str) {
        self.line("→", self.styles.running, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.ok, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warn, msg);
    }

    /// Print the aborting error to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.fail));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    /// Summary line with the key padded and dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            let key = format!("{key:<LABEL_WIDTH$}");
            println!("  {}  {value}", key.style(self.styles.label));
        }
    }
}
