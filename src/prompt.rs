//! Interactive prompting
//!
//! The pipeline only talks to the `Prompter` trait, so tests can drive it
//! with a `ScriptedPrompter` instead of a terminal.

use std::collections::VecDeque;

use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::error::{ChangelogError, Result};

/// Source of the interactive answers the range selection and credential
/// lookup need
pub trait Prompter {
   /// Pick one entry from `options`, returning its index
   fn choose_one(&mut self, message: &str, options: &[String]) -> Result<usize>;

   /// Free-form single line of text
   fn read_text(&mut self, message: &str) -> Result<String>;

   /// Masked input for secrets
   fn read_secret(&mut self, message: &str) -> Result<String>;
}

/// `Prompter` backed by `inquire` on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
   fn choose_one(&mut self, message: &str, options: &[String]) -> Result<usize> {
      let choice = Select::new(message, options.to_vec())
         .with_page_size(15)
         .raw_prompt()?;
      Ok(choice.index)
   }

   fn read_text(&mut self, message: &str) -> Result<String> {
      Ok(Text::new(message).prompt()?)
   }

   fn read_secret(&mut self, message: &str) -> Result<String> {
      Ok(Password::new(message)
         .with_display_mode(PasswordDisplayMode::Masked)
         .without_confirmation()
         .prompt()?)
   }
}

/// Pre-recorded answers, consumed in order
///
/// Public so the integration tests under `tests/` can drive the pipeline
/// without a terminal; the binary always uses `TerminalPrompter`.
///
/// `choose_one` matches an answer against the option text exactly, or against
/// the option's first word (so `"v1.0.0"` selects `"v1.0.0 (2024-01-01)"`).
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
   answers:   VecDeque<String>,
   /// Every prompt message shown, in order
   pub asked: Vec<String>,
}

impl ScriptedPrompter {
   pub fn new<I, S>(answers: I) -> Self
   where
      I: IntoIterator<Item = S>,
      S: Into<String>,
   {
      Self { answers: answers.into_iter().map(Into::into).collect(), asked: Vec::new() }
   }

   fn next_answer(&mut self, message: &str) -> Result<String> {
      self.asked.push(message.to_string());
      self
         .answers
         .pop_front()
         .ok_or(ChangelogError::PromptError(InquireError::OperationCanceled))
   }
}

impl Prompter for ScriptedPrompter {
   fn choose_one(&mut self, message: &str, options: &[String]) -> Result<usize> {
      let answer = self.next_answer(message)?;
      options
         .iter()
         .position(|opt| *opt == answer)
         .or_else(|| {
            options
               .iter()
               .position(|opt| opt.split_whitespace().next() == Some(answer.as_str()))
         })
         .ok_or_else(|| {
            ChangelogError::InvalidSelection(format!("'{answer}' is not one of the options"))
         })
   }

   fn read_text(&mut self, message: &str) -> Result<String> {
      self.next_answer(message)
   }

   fn read_secret(&mut self, message: &str) -> Result<String> {
      self.next_answer(message)
   }
}
