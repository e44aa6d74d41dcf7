use std::{fmt, path::PathBuf};

use clap::Parser;

use crate::error::{ChangelogError, Result};

// === Revisions and ranges ===

/// Opaque identifier for a point in history (commit hash or tag name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RevisionRef(String);

impl RevisionRef {
   pub fn new(rev: impl Into<String>) -> Self {
      Self(rev.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl fmt::Display for RevisionRef {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

/// Exclusive-inclusive span of history, `from..to`
///
/// `from` and `to` always differ. Ancestry is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
   pub from: RevisionRef,
   pub to:   RevisionRef,
}

impl Range {
   pub fn new(from: RevisionRef, to: RevisionRef) -> Result<Self> {
      if from == to {
         return Err(ChangelogError::InvalidSelection(format!(
            "'{from}' was chosen as both start and end of the range"
         )));
      }
      Ok(Self { from, to })
   }

   /// `from..to` notation for git log
   pub fn spec(&self) -> String {
      format!("{}..{}", self.from, self.to)
   }
}

impl fmt::Display for Range {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}..{}", self.from, self.to)
   }
}

// === Listings ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
   pub name: String,
   pub date: String,
}

impl fmt::Display for TagInfo {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      if self.date.is_empty() {
         f.write_str(&self.name)
      } else {
         write!(f, "{} ({})", self.name, self.date)
      }
   }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
   pub hash:    String,
   pub date:    String,
   pub subject: String,
}

impl CommitInfo {
   pub fn short_hash(&self) -> &str {
      self.hash.get(..7).unwrap_or(&self.hash)
   }
}

impl fmt::Display for CommitInfo {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{} {} {}", self.short_hash(), self.date, self.subject)
   }
}

// === Generation mode ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
   /// Between two tags
   Tags,
   /// Between two commits
   Commits,
   /// Between two points in time
   TimeInterval,
}

impl Strategy {
   pub const ALL: [Self; 3] = [Self::Tags, Self::Commits, Self::TimeInterval];

   pub const fn label(self) -> &'static str {
      match self {
         Self::Tags => "Between two tags",
         Self::Commits => "Between two commits",
         Self::TimeInterval => "Over a time interval",
      }
   }
}

impl fmt::Display for Strategy {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.label())
   }
}

// === Pipeline payloads ===

/// Formatted log / file-status / stat summary for one range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryText(String);

impl HistoryText {
   pub const fn new(text: String) -> Self {
      Self(text)
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl fmt::Display for HistoryText {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

// === CLI ===

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Generate a changelog for a git range with an LLM and serve it")]
pub struct Args {
   /// Directory inside the git repository to summarize
   #[arg(long, default_value = ".")]
   pub dir: String,

   /// Path to config file (default: ~/.config/llm-changelog/config.toml)
   #[arg(long)]
   pub config: Option<PathBuf>,

   /// Port for the docsify preview server
   #[arg(long)]
   pub port: Option<u16>,

   /// Write the changelog without starting the preview server
   #[arg(long)]
   pub no_serve: bool,

   /// Directory to write the collected history and rendered prompt into
   #[arg(long)]
   pub debug_output: Option<PathBuf>,
}

impl Default for Args {
   fn default() -> Self {
      Self {
         dir:          ".".to_string(),
         config:       None,
         port:         None,
         no_serve:     false,
         debug_output: None,
      }
   }
}
