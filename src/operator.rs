//! Interactive operator prompts
//!
//! Orchestrators never read stdin directly; they take an [`Operator`] so
//! a scripted source can stand in during tests or non-interactive runs.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::Result;

/// Capability interface guarding state-changing actions.
pub trait Operator {
    /// Blocking yes/no prompt. Only a case-insensitive `y` proceeds;
    /// any other answer, including an empty one, declines.
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(is_affirmative(&self.prompt_line(prompt)?))
    }

    /// Blocking free-form prompt. Returns the trimmed line.
    fn prompt_line(&mut self, prompt: &str) -> Result<String>;
}

/// The single affirmative token check.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Real operator on stdin/stdout. No timeout: the operator is trusted to
/// eventually answer or terminate the process.
pub struct StdinOperator;

impl Operator for StdinOperator {
    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Scripted responses, consumed front to back. An exhausted script
/// answers with an empty line, which declines any confirmation.
pub struct ScriptedOperator {
    responses: VecDeque<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

impl Operator for ScriptedOperator {
    fn prompt_line(&mut self, _prompt: &str) -> Result<String> {
        Ok(self
            .responses
            .pop_front()
            .map(|line| line.trim().to_string())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_y_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("  y  "));

        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("maybe"));
        assert!(!is_affirmative("yes"));
    }

    #[test]
    fn scripted_operator_replays_in_order() {
        let mut operator = ScriptedOperator::new(["Y", "1500000"]);
        assert!(operator.confirm("proceed? ").unwrap());
        assert_eq!(operator.prompt_line("gas: ").unwrap(), "1500000");
    }

    #[test]
    fn exhausted_script_declines() {
        let mut operator = ScriptedOperator::new(Vec::<String>::new());
        assert!(!operator.confirm("proceed? ").unwrap());
        assert_eq!(operator.prompt_line("anything: ").unwrap(), "");
    }
}
