//! Console conflict prompt
//!
//! Shows the two candidates for a field and reads the operator's answer from
//! a line of input. An answer starting with `2` selects the second candidate;
//! anything else, including end of input, keeps the first.

use super::tag_merger::{ConflictChoice, ConflictResolver};
use crate::types::MetadataField;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Line-oriented prompt over any reader/writer pair
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(
        &mut self,
        field: MetadataField,
        file_name: &str,
        first: &str,
        second: &str,
    ) -> io::Result<String> {
        write!(
            self.output,
            "\nInconsistencies found in tag '{}' for '{}' file\n\t1. {}\n\t2. {}\n",
            field, file_name, first, second
        )?;
        write!(self.output, "which one should be used [1/2]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> ConflictResolver for ConsolePrompt<R, W> {
    fn choose(
        &mut self,
        field: MetadataField,
        file_name: &str,
        first: &str,
        second: &str,
    ) -> ConflictChoice {
        match self.ask(field, file_name, first, second) {
            Ok(answer) if answer.trim_start().starts_with('2') => ConflictChoice::Second,
            Ok(_) => ConflictChoice::First,
            Err(e) => {
                warn!("Conflict prompt failed, keeping first candidate: {}", e);
                ConflictChoice::First
            }
        }
    }
}
