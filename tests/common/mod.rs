//! Throwaway git repositories for integration tests

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{path::Path, process::Command};

use tempfile::TempDir;

pub struct TempRepo {
   pub dir: TempDir,
}

impl TempRepo {
   pub fn init() -> Self {
      let repo = Self { dir: tempfile::tempdir().unwrap() };
      repo.git(&["init", "-q"]);
      repo.git(&["config", "user.name", "Test Author"]);
      repo.git(&["config", "user.email", "author@example.com"]);
      repo.git(&["config", "commit.gpgsign", "false"]);
      repo.git(&["config", "tag.gpgsign", "false"]);
      repo
   }

   pub fn path(&self) -> &Path {
      self.dir.path()
   }

   pub fn git(&self, args: &[&str]) -> String {
      self.git_with_env(args, &[])
   }

   fn git_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> String {
      let output = Command::new("git")
         .args(args)
         .envs(env.iter().copied())
         .current_dir(self.path())
         .output()
         .unwrap();
      assert!(
         output.status.success(),
         "git {} failed: {}",
         args.join(" "),
         String::from_utf8_lossy(&output.stderr)
      );
      String::from_utf8_lossy(&output.stdout).trim().to_string()
   }

   /// Write `name` and commit it, returning the new HEAD hash
   pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> String {
      std::fs::write(self.path().join(name), contents).unwrap();
      self.git(&["add", name]);
      self.git(&["commit", "-q", "-m", message]);
      self.git(&["rev-parse", "HEAD"])
   }

   /// Like `commit_file`, with author and committer date pinned to `date`
   pub fn commit_file_at(&self, name: &str, contents: &str, message: &str, date: &str) -> String {
      std::fs::write(self.path().join(name), contents).unwrap();
      self.git(&["add", name]);
      self.git_with_env(&["commit", "-q", "-m", message], &[
         ("GIT_AUTHOR_DATE", date),
         ("GIT_COMMITTER_DATE", date),
      ]);
      self.git(&["rev-parse", "HEAD"])
   }

   pub fn tag(&self, name: &str) {
      self.git(&["tag", name]);
   }
}
