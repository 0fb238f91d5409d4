//! Yes/no confirmation before destructive operations

use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Asks the user to approve an action
pub trait Confirmation {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

impl<C: Confirmation + ?Sized> Confirmation for &mut C {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        (**self).confirm(question)
    }
}

/// Ask `question` until the answer is y/yes/n/no (any case).
///
/// End of input counts as "no" so a closed stdin never loops forever.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    loop {
        write!(output, "{} (y/n) ", question)?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            tracing::debug!("confirmation input closed, treating as no");
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Your response is invalid, please enter y or n")?,
        }
    }
}

/// Confirmation read from the terminal
#[derive(Debug, Default)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        confirm(&mut stdin.lock(), &mut stdout, question)
    }
}

/// Confirmation that answers every question the same way (`--dry-run`, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation(pub bool);

impl Confirmation for FixedConfirmation {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        tracing::debug!(question, answer = self.0, "answering confirmation automatically");
        Ok(self.0)
    }
}
