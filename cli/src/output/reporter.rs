//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg} {elapsed:.dim}";
const DONE_TEMPLATE: &str = "  {prefix:.green} {msg}";

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ⚠ {message}"`
/// - `wait_start()` shows a spinner on a TTY, a plain step line otherwise
///
/// Everything except warnings is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn wait_start(&self, message: &str) {
        if self.ctx.show_progress() {
            *self.spinner.borrow_mut() = Some(spinner(message));
        } else {
            self.ctx.step(message);
        }
    }

    fn wait_finish(&self, message: &str) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            if let Ok(style) = ProgressStyle::with_template(DONE_TEMPLATE) {
                pb.set_style(style);
            }
            pb.set_prefix("✓");
            pb.finish_with_message(message.to_string());
        }
    }
}

/// Spinner for a wait of unknown length, such as cloud-init.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        pb.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
        );
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
