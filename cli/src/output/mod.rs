//! Output formatting module

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let styles = if use_colors {
            Styles::colored()
        } else {
            Styles::plain()
        };

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a plain line. Suppressed when `quiet`.
    pub fn line(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// Print an in-progress step prefixed with `→`. Suppressed when `quiet`.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "→".style(self.styles.step));
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠` to stderr. Never suppressed.
    pub fn warn(&self, msg: &str) {
        eprintln!("  {} {msg}", "⚠".style(self.styles.warning));
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a command hint: a dimmed label and the command to run.
    /// Suppressed when `quiet`.
    pub fn hint(&self, label: &str, command: &str) {
        if !self.quiet {
            println!();
            println!("{}", label.style(self.styles.hint));
            println!("    {}", command.style(self.styles.command));
            println!();
        }
    }
}
