use std::io::{self, BufRead, Write};

use crate::orchestrator::Confirm;

/// Asks on stdout and reads one line from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        print!("{question}");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

/// `y` or `yes`, any case. Everything else, including no input, is no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
