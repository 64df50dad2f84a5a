use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::application::{Presenter, RenderModel};

/// Line-oriented presenter over any reader/writer pair.
///
/// Confirmation answers are read from the same input as commands, so a piped
/// script can answer `clear` prompts inline.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes without reading input.
    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Read the next line, without its line terminator. `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Print a prompt string without a trailing newline.
    pub fn prompt(&mut self, prompt: &str) -> Result<()> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn println(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write raw bytes (exports) straight to the output.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.output.write_all(bytes)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Presenter for TerminalPresenter<R, W> {
    fn render(&mut self, model: &RenderModel) -> Result<()> {
        writeln!(self.output, "Showing: {}", model.filter)?;
        if model.rows.is_empty() {
            writeln!(self.output, "  (no transactions)")?;
        } else {
            for row in &model.rows {
                writeln!(self.output, "  {:<32} {:>14}", row.description, row.amount)?;
            }
        }
        writeln!(self.output, "Balance: {}", model.balance)?;
        self.output.flush()?;
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            debug!(question, "confirmation assumed");
            writeln!(self.output, "{} [y/N] y", question)?;
            return Ok(true);
        }

        self.prompt(&format!("{} [y/N] ", question))?;
        let answer = self.read_line()?.unwrap_or_default();
        let confirmed = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
        if !confirmed {
            writeln!(self.output, "Cancelled.")?;
        }
        Ok(confirmed)
    }
}
