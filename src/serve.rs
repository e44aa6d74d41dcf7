//! Local preview of the generated site through docsify

use std::{
   path::{Path, PathBuf},
   process::{Command, Stdio},
};

use crate::{
   error::{ChangelogError, Result},
   style,
};

const DOCSIFY: &str = if cfg!(windows) { "docsify.cmd" } else { "docsify" };

#[derive(Debug, Clone)]
pub struct SitePublisher {
   root:     PathBuf,
   site_dir: PathBuf,
   port:     u16,
   program:  Option<PathBuf>,
}

impl SitePublisher {
   pub fn new(root: &Path, site_dir: &Path, port: u16) -> Self {
      Self { root: root.to_path_buf(), site_dir: site_dir.to_path_buf(), port, program: None }
   }

   /// Use `program` instead of searching for docsify
   pub fn with_program(mut self, program: Option<PathBuf>) -> Self {
      self.program = program;
      self
   }

   /// Install locations checked before falling back to `PATH`, in order
   pub fn candidates(&self) -> Vec<PathBuf> {
      let mut candidates = vec![self.root.join("node_modules").join(".bin").join(DOCSIFY)];
      if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
         candidates.push(PathBuf::from(home).join(".npm-global").join("bin").join(DOCSIFY));
      }
      if cfg!(unix) {
         candidates.push(PathBuf::from("/usr/local/bin").join(DOCSIFY));
      }
      candidates
   }

   /// The configured program, else the first existing candidate, else
   /// whatever `PATH` resolves, else the bare command name
   pub fn locate(&self) -> PathBuf {
      if let Some(program) = &self.program {
         return program.clone();
      }
      self
         .candidates()
         .into_iter()
         .find(|path| path.is_file())
         .or_else(|| which::which(DOCSIFY).ok())
         .unwrap_or_else(|| PathBuf::from(DOCSIFY))
   }

   /// Manual command suggested when the server cannot be started, run from
   /// the repository root
   pub fn hint(&self) -> String {
      let dir = self.site_dir.strip_prefix(&self.root).unwrap_or(&self.site_dir);
      format!("npx docsify-cli serve {} --port {}", dir.display(), self.port)
   }

   /// Run the server attached to this terminal until it exits
   pub fn publish(&self) -> Result<()> {
      self.run(&self.locate())
   }

   /// `publish`, downgrading a failed start to a warning
   pub fn publish_or_warn(&self) {
      match self.publish() {
         Ok(()) => {},
         Err(e) if !e.is_fatal() => {
            style::warn(&e.to_string());
            style::warn(&format!("Start it manually with: {}", self.hint()));
         },
         Err(e) => style::warn(&format!("Preview server stopped: {e}")),
      }
   }

   fn run(&self, program: &Path) -> Result<()> {
      let mut child = Command::new(program)
         .arg("serve")
         .arg(&self.site_dir)
         .arg("--port")
         .arg(self.port.to_string())
         .current_dir(&self.root)
         .stdin(Stdio::inherit())
         .stdout(Stdio::inherit())
         .stderr(Stdio::inherit())
         .spawn()
         .map_err(|e| ChangelogError::ServerSpawnFailure {
            program: program.display().to_string(),
            reason:  e.to_string(),
         })?;

      style::print_info(&format!(
         "Serving {} on http://localhost:{} (Ctrl-C to stop)",
         self.site_dir.display(),
         self.port
      ));

      let status = child.wait()?;
      if !status.success() {
         style::warn(&format!("docsify exited with {status}"));
      }
      Ok(())
   }
}
