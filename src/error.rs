use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
   #[error("Not a git repository: {0}")]
   NotAVersionControlRepository(String),

   #[error("No tags found in repository")]
   NoTagsFound,

   #[error("No commits found in repository")]
   NoCommitsFound,

   #[error("Invalid selection: {0}")]
   InvalidSelection(String),

   #[error("Could not parse date expression '{input}'")]
   DateParseFailure { input: String },

   #[error("No commit found before {timestamp}")]
   NoRevisionForTimestamp { timestamp: String },

   #[error("No API key provided (set LLM_CHANGELOG_API_KEY or enter one when prompted)")]
   MissingCredential,

   #[error("Completion request failed (HTTP {status}): {body}")]
   CompletionServiceError { status: u16, body: String },

   #[error("Completion service returned an empty changelog")]
   EmptyCompletion,

   #[error("Failed to start site server '{program}': {reason}")]
   ServerSpawnFailure { program: String, reason: String },

   #[error("Git command failed: {0}")]
   GitError(String),

   #[error("Prompt failed: {0}")]
   PromptError(#[from] inquire::InquireError),

   #[error("Template error: {0}")]
   TemplateError(String),

   #[error("Config error: {0}")]
   ConfigError(String),

   #[error("IO error: {0}")]
   IoError(#[from] std::io::Error),

   #[error("JSON error: {0}")]
   JsonError(#[from] serde_json::Error),

   #[error("HTTP error: {0}")]
   HttpError(#[from] reqwest::Error),
}

impl ChangelogError {
   /// Errors that are reported but never fail the run.
   pub const fn is_fatal(&self) -> bool {
      !matches!(self, Self::ServerSpawnFailure { .. })
   }
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
