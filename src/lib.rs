//! Interactive changelog generator library
//!
//! Resolves a git range (tags, commits or a time interval), summarizes its
//! history, asks an OpenAI-compatible completion endpoint for a Markdown
//! changelog and publishes it as a docsify site.
pub mod api;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod range;
pub mod serve;
pub mod site;
pub mod style;
pub mod templates;
pub mod tokens;
pub mod types;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types
pub use config::ChangelogConfig;
pub use error::{ChangelogError, Result};
pub use git::{GitCli, History};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use types::{Args, HistoryText, Range, RevisionRef, Strategy};
