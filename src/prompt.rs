//! The interactive prompt seam. The lifecycle orchestrator asks its
//! questions through the [`Prompt`] trait rather than reading stdin
//! directly, so the interactive branching logic is testable without a real
//! terminal.

use std::io::{self, BufRead, Write};

/// A source of operator answers. One outstanding question at a time; every
/// answer is returned with surrounding whitespace trimmed.
pub trait Prompt {
    /// Asks the operator a question and blocks for the answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// The production [`Prompt`]: prints the question and reads one line from
/// stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{} ", question);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_owned())
    }
}

/// A scripted [`Prompt`] for tests: answers questions from a fixed list,
/// then keeps answering with the empty string.
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<const N: usize>(answers: [&str; N]) -> ScriptedPrompt {
        ScriptedPrompt {
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, _question: &str) -> io::Result<String> {
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
