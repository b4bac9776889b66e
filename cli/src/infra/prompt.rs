//! Terminal implementation of the `Prompter` port.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};

use crate::application::ports::Prompter;

/// Prompts on the terminal with `dialoguer`.
///
/// When `non_interactive` is set, `confirm` answers with its default and
/// `select` declines to choose.
pub struct DialoguerPrompter {
    non_interactive: bool,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("confirmation prompt")
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        if self.non_interactive {
            return Ok(None);
        }
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .context("instance selection")
    }
}
