//! History text assembly
//!
//! Turns the three range queries (log, name-status, stat) into the block of
//! Markdown that is appended to the changelog prompt.

use crate::{
   error::Result,
   git::History,
   types::{HistoryText, Range},
};

pub const COMMITS_HEADING: &str = "## Commits";
pub const FILES_HEADING: &str = "## Changed files";
pub const STATS_HEADING: &str = "## Diff stats";

pub const NO_COMMITS: &str = "no commits";
pub const NO_FILE_CHANGES: &str = "no file changes";
pub const NO_STATS: &str = "no stats";

/// Gather log, file status and diff stats for `range`
pub fn collect<H: History + ?Sized>(history: &H, range: &Range) -> Result<HistoryText> {
   let log = history.log(range)?;
   let files = history.name_status(range)?;
   let stat = history.stat(range)?;
   Ok(format_history(&log, &files, &stat))
}

/// Lay out the three sections in fixed order, substituting placeholders
pub fn format_history(log: &str, files: &str, stat: &str) -> HistoryText {
   let sections = [
      (COMMITS_HEADING, log, NO_COMMITS),
      (FILES_HEADING, files, NO_FILE_CHANGES),
      (STATS_HEADING, stat, NO_STATS),
   ];

   let text = sections
      .iter()
      .map(|(heading, body, placeholder)| {
         let body = body.trim_end();
         let body = if body.trim().is_empty() { *placeholder } else { body };
         format!("{heading}\n{body}\n")
      })
      .collect::<Vec<_>>()
      .join("\n");

   HistoryText::new(text)
}
