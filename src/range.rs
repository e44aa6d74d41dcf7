//! Range selection
//!
//! Each generation mode asks the user for two endpoints and produces the same
//! `Range`, so everything downstream is independent of how it was chosen.

use chrono::{DateTime, Local};
use interim::{Dialect, parse_date_string};

use crate::{
   error::{ChangelogError, Result},
   git::History,
   prompt::Prompter,
   style,
   types::{Range, RevisionRef, Strategy},
};

/// Ask which kind of range to summarize
pub fn choose_strategy(prompter: &mut dyn Prompter) -> Result<Strategy> {
   let labels: Vec<String> = Strategy::ALL.iter().map(ToString::to_string).collect();
   let index = prompter.choose_one("Generate changelog", &labels)?;
   Ok(Strategy::ALL[index])
}

/// Resolve a `Range` using the chosen strategy
pub fn resolve_range(
   strategy: Strategy,
   history: &dyn History,
   prompter: &mut dyn Prompter,
   commit_limit: usize,
) -> Result<Range> {
   match strategy {
      Strategy::Tags => resolve_tags(history, prompter),
      Strategy::Commits => resolve_commits(history, prompter, commit_limit),
      Strategy::TimeInterval => resolve_time_interval(history, prompter, Local::now()),
   }
}

/// Pick an older and a newer tag
pub fn resolve_tags(history: &dyn History, prompter: &mut dyn Prompter) -> Result<Range> {
   let tags = history.tags()?;
   if tags.is_empty() {
      return Err(ChangelogError::NoTagsFound);
   }

   let labels: Vec<String> = tags.iter().map(ToString::to_string).collect();
   let from = prompter.choose_one("Older tag (from)", &labels)?;
   let to = prompter.choose_one("Newer tag (to)", &labels)?;

   Range::new(RevisionRef::new(&tags[from].name), RevisionRef::new(&tags[to].name))
}

/// Pick an older and a newer commit among the most recent `limit`
pub fn resolve_commits(
   history: &dyn History,
   prompter: &mut dyn Prompter,
   limit: usize,
) -> Result<Range> {
   let commits = history.commits(limit)?;
   if commits.is_empty() {
      return Err(ChangelogError::NoCommitsFound);
   }

   let labels: Vec<String> = commits.iter().map(ToString::to_string).collect();
   let from = prompter.choose_one("Older commit (from)", &labels)?;
   let to = prompter.choose_one("Newer commit (to)", &labels)?;

   let range =
      Range::new(RevisionRef::new(&commits[from].hash), RevisionRef::new(&commits[to].hash))?;
   warn_if_unrelated(history, &range);
   Ok(range)
}

/// Unrelated endpoints still produce a direct comparison; only tell the user
fn warn_if_unrelated(history: &dyn History, range: &Range) {
   match history.is_ancestor(&range.from, &range.to) {
      Ok(true) => {},
      Ok(false) => style::warn(&format!(
         "{} is not an ancestor of {}; the changelog will compare the two snapshots directly",
         short(&range.from),
         short(&range.to)
      )),
      Err(e) => style::warn(&format!("Could not verify commit ancestry: {e}")),
   }
}

fn short(rev: &RevisionRef) -> &str {
   rev.as_str().get(..7).unwrap_or(rev.as_str())
}

/// Ask for two date expressions and map them to the commits just before them
pub fn resolve_time_interval(
   history: &dyn History,
   prompter: &mut dyn Prompter,
   now: DateTime<Local>,
) -> Result<Range> {
   let start_input = prompter.read_text("Start (e.g. \"2 weeks ago\", \"2024-03-01\")")?;
   let end_input = prompter.read_text("End (e.g. \"now\", \"yesterday\")")?;

   let mut start = parse_date_expression(&start_input, now)?;
   let mut end = parse_date_expression(&end_input, now)?;
   if start > end {
      std::mem::swap(&mut start, &mut end);
   }

   let from = revision_at(history, &start)?;
   let to = revision_at(history, &end)?;
   Range::new(from, to)
}

fn revision_at(history: &dyn History, timestamp: &DateTime<Local>) -> Result<RevisionRef> {
   history
      .revision_before(timestamp)?
      .ok_or_else(|| ChangelogError::NoRevisionForTimestamp {
         timestamp: timestamp.format("%Y-%m-%d %H:%M:%S %z").to_string(),
      })
}

/// Parse a natural-language date relative to `now`
pub fn parse_date_expression(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
   let trimmed = input.trim();
   if trimmed.eq_ignore_ascii_case("now") {
      return Ok(now);
   }
   if trimmed.is_empty() {
      return Err(ChangelogError::DateParseFailure { input: input.to_string() });
   }

   parse_date_string(trimmed, now, Dialect::Us)
      .map_err(|_| ChangelogError::DateParseFailure { input: input.to_string() })
}
