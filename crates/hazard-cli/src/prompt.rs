//! Terminal yes/no confirmation.

use std::io::{self, BufRead, Write};

use hazard_client::Confirmation;

/// `y`/`yes` in any case accepts; anything else declines
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmation {
    /// `--yes`: accept without asking
    pub assume_yes: bool,
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stdout = io::stdout();
        if write!(stdout, "{prompt} [y/N] ").and_then(|()| stdout.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}
