//! In-memory test doubles for the history interface

use chrono::{DateTime, Local};

use crate::{
   error::{ChangelogError, Result},
   git::History,
   types::{CommitInfo, Range, RevisionRef, TagInfo},
};

/// Canned answers for every `History` query
#[derive(Debug, Clone)]
pub struct FakeHistory {
   pub tags:        Vec<TagInfo>,
   pub commits:     Vec<CommitInfo>,
   /// `None` makes the ancestry check fail
   pub ancestry:    Option<bool>,
   /// Commit timestamps, oldest first
   pub revisions:   Vec<(DateTime<Local>, String)>,
   pub log:         String,
   pub name_status: String,
   pub stat:        String,
}

impl Default for FakeHistory {
   fn default() -> Self {
      Self {
         tags:        Vec::new(),
         commits:     Vec::new(),
         ancestry:    Some(true),
         revisions:   Vec::new(),
         log:         String::new(),
         name_status: String::new(),
         stat:        String::new(),
      }
   }
}

impl History for FakeHistory {
   fn tags(&self) -> Result<Vec<TagInfo>> {
      Ok(self.tags.clone())
   }

   fn commits(&self, limit: usize) -> Result<Vec<CommitInfo>> {
      Ok(self.commits.iter().take(limit).cloned().collect())
   }

   fn is_ancestor(&self, _older: &RevisionRef, _newer: &RevisionRef) -> Result<bool> {
      self
         .ancestry
         .ok_or_else(|| ChangelogError::GitError("merge-base unavailable".to_string()))
   }

   fn revision_before(&self, timestamp: &DateTime<Local>) -> Result<Option<RevisionRef>> {
      Ok(self
         .revisions
         .iter()
         .rev()
         .find(|(at, _)| at <= timestamp)
         .map(|(_, rev)| RevisionRef::new(rev)))
   }

   fn log(&self, _range: &Range) -> Result<String> {
      Ok(self.log.clone())
   }

   fn name_status(&self, _range: &Range) -> Result<String> {
      Ok(self.name_status.clone())
   }

   fn stat(&self, _range: &Range) -> Result<String> {
      Ok(self.stat.clone())
   }
}
