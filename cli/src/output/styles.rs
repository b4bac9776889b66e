//! Message styles, one per kind of line the CLI prints.

use owo_colors::Style;

/// Stylesheet for CLI output. [`Styles::plain`] applies no escapes at all.
#[derive(Default, Clone)]
pub struct Styles {
    /// `→` marker of an in-progress step.
    pub step: Style,
    /// `✓` marker of a completed step.
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Label above a suggested command.
    pub hint: Style,
    /// A command the user can copy.
    pub command: Style,
}

impl Styles {
    /// No colors: used for `--no-color`, `NO_COLOR`, and non-terminal stdout.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn colored() -> Self {
        Self {
            step: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            hint: Style::new().dimmed(),
            command: Style::new().bold().cyan(),
        }
    }
}
