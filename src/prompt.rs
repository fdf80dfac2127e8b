//! Yes/no confirmation before destructive commands.
use anyhow::{Context as _, Result};
use std::io::{self, BufRead as _, Write as _};

/// Asks the user to confirm an action.
///
/// Commands take `&dyn Prompt` so tests can answer without a terminal.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Ask `question`; returns `true` only on an explicit yes.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// [`Prompt`] reading the answer from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    #[allow(clippy::print_stdout)]
    fn confirm(&self, question: &str) -> Result<bool> {
        print!("{question} [y/N]: ");
        io::stdout().flush().context("flushing stdout")?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("reading confirmation")?;
        Ok(is_affirmative(&answer))
    }
}

/// Returns `true` for `y` or `yes` in any case; everything else, including
/// an empty line, means no.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
