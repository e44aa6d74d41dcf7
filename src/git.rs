use std::{
   path::{Path, PathBuf},
   process::{Command, Output},
};

use chrono::{DateTime, Local};

use crate::{
   error::{ChangelogError, Result},
   history,
   types::{CommitInfo, HistoryText, Range, RevisionRef, TagInfo},
};

/// Read-only history queries the changelog pipeline depends on.
///
/// `GitCli` answers them by shelling out to `git`; tests substitute an
/// in-memory implementation.
pub trait History {
   /// Tags, newest first by creation date
   fn tags(&self) -> Result<Vec<TagInfo>>;

   /// Up to `limit` most recent commits reachable from HEAD, newest first
   fn commits(&self, limit: usize) -> Result<Vec<CommitInfo>>;

   /// Whether `older` is an ancestor of `newer`
   fn is_ancestor(&self, older: &RevisionRef, newer: &RevisionRef) -> Result<bool>;

   /// Most recent commit on HEAD at or before `timestamp`
   fn revision_before(&self, timestamp: &DateTime<Local>) -> Result<Option<RevisionRef>>;

   /// Commit log (author, date, subject, body) for `from..to`
   fn log(&self, range: &Range) -> Result<String>;

   /// `--name-status` diff between the range endpoints
   fn name_status(&self, range: &Range) -> Result<String>;

   /// `--stat` diff between the range endpoints
   fn stat(&self, range: &Range) -> Result<String>;

   /// All three range queries formatted into one block
   fn diff_summary(&self, range: &Range) -> Result<HistoryText> {
      history::collect(self, range)
   }
}

/// `History` backed by the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
   root: PathBuf,
}

impl GitCli {
   /// Locate the working-tree root containing `dir`
   pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
      let dir = dir.as_ref();
      let output = Command::new("git")
         .args(["rev-parse", "--show-toplevel"])
         .current_dir(dir)
         .output()
         .map_err(|e| {
            ChangelogError::NotAVersionControlRepository(format!("{}: {e}", dir.display()))
         })?;

      if !output.status.success() {
         let stderr = String::from_utf8_lossy(&output.stderr);
         return Err(ChangelogError::NotAVersionControlRepository(format!(
            "{}: {}",
            dir.display(),
            stderr.trim()
         )));
      }

      let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
      Ok(Self { root: PathBuf::from(root) })
   }

   pub fn root(&self) -> &Path {
      &self.root
   }

   fn output(&self, args: &[&str]) -> Result<Output> {
      Command::new("git")
         .args(args)
         .current_dir(&self.root)
         .output()
         .map_err(|e| ChangelogError::GitError(format!("Failed to run git {}: {e}", args[0])))
   }

   /// False on an unborn HEAD (a fresh repository with no commits yet)
   fn has_head(&self) -> Result<bool> {
      Ok(self.output(&["rev-parse", "--verify", "--quiet", "HEAD"])?.status.success())
   }

   /// Run git and return stdout, failing on a non-zero exit
   fn run(&self, args: &[&str]) -> Result<String> {
      let output = self.output(args)?;

      if !output.status.success() {
         let stderr = String::from_utf8_lossy(&output.stderr);
         return Err(ChangelogError::GitError(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
         )));
      }

      Ok(String::from_utf8_lossy(&output.stdout).to_string())
   }
}

impl History for GitCli {
   fn tags(&self) -> Result<Vec<TagInfo>> {
      let stdout = self.run(&[
         "tag",
         "--list",
         "--sort=-creatordate",
         "--format=%(refname:short)%09%(creatordate:short)",
      ])?;
      Ok(parse_tag_lines(&stdout))
   }

   fn commits(&self, limit: usize) -> Result<Vec<CommitInfo>> {
      if !self.has_head()? {
         return Ok(Vec::new());
      }

      let stdout = self.run(&[
         "log",
         &format!("-{limit}"),
         "--date=short",
         "--pretty=format:%H%x09%ad%x09%s",
      ])?;
      Ok(parse_commit_lines(&stdout))
   }

   fn is_ancestor(&self, older: &RevisionRef, newer: &RevisionRef) -> Result<bool> {
      let output =
         self.output(&["merge-base", "--is-ancestor", older.as_str(), newer.as_str()])?;

      // exit code 0 = ancestor, 1 = not an ancestor, anything else = error
      match output.status.code() {
         Some(0) => Ok(true),
         Some(1) => Ok(false),
         _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ChangelogError::GitError(format!("git merge-base failed: {}", stderr.trim())))
         },
      }
   }

   fn revision_before(&self, timestamp: &DateTime<Local>) -> Result<Option<RevisionRef>> {
      if !self.has_head()? {
         return Ok(None);
      }
      let before = format!("--before={}", timestamp.to_rfc3339());
      let stdout = self.run(&["rev-list", "-1", &before, "HEAD"])?;
      let hash = stdout.trim();
      Ok((!hash.is_empty()).then(|| RevisionRef::new(hash)))
   }

   fn log(&self, range: &Range) -> Result<String> {
      self.run(&[
         "log",
         "--date=short",
         "--pretty=format:- %h %an %ad%n  %s%n%b",
         &range.spec(),
      ])
   }

   fn name_status(&self, range: &Range) -> Result<String> {
      self.run(&["diff", "--name-status", range.from.as_str(), range.to.as_str()])
   }

   fn stat(&self, range: &Range) -> Result<String> {
      self.run(&["diff", "--stat", range.from.as_str(), range.to.as_str()])
   }
}

/// Parse `name<TAB>date` lines from the tag listing
fn parse_tag_lines(stdout: &str) -> Vec<TagInfo> {
   stdout
      .lines()
      .filter(|line| !line.trim().is_empty())
      .map(|line| {
         let (name, date) = line.split_once('\t').unwrap_or((line, ""));
         TagInfo { name: name.trim().to_string(), date: date.trim().to_string() }
      })
      .collect()
}

/// Parse `hash<TAB>date<TAB>subject` lines from the commit listing
fn parse_commit_lines(stdout: &str) -> Vec<CommitInfo> {
   stdout
      .lines()
      .filter_map(|line| {
         let mut parts = line.splitn(3, '\t');
         let hash = parts.next()?.trim();
         if hash.is_empty() {
            return None;
         }
         Some(CommitInfo {
            hash:    hash.to_string(),
            date:    parts.next().unwrap_or_default().to_string(),
            subject: parts.next().unwrap_or_default().to_string(),
         })
      })
      .collect()
}
