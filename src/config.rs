use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ChangelogError, Result};

/// How the credential is attached to the completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
   /// `Authorization: Bearer <key>` (OpenAI and most proxies)
   #[default]
   Bearer,
   /// `api-key: <key>` (Azure OpenAI deployments)
   ApiKey,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
   pub api_base_url: String,

   /// Optional API key for authentication (overridden by
   /// `LLM_CHANGELOG_API_KEY` env var)
   pub api_key: Option<String>,

   pub auth_scheme: AuthScheme,

   /// Model name sent with the request; empty means the endpoint decides
   pub model: String,

   pub temperature: f32,
   pub max_tokens:  u32,

   /// Overall HTTP request timeout in seconds (unset: wait indefinitely)
   pub request_timeout_secs: Option<u64>,

   /// HTTP connection timeout in seconds
   pub connect_timeout_secs: u64,

   /// How many recent commits the commit picker offers
   pub commit_limit: usize,

   pub output_file:    String,
   pub site_dir:       String,
   pub server_port:    u16,
   /// docsify executable to run instead of searching for one
   pub server_program: Option<String>,
   pub prompt_variant: String,
}

impl Default for ChangelogConfig {
   fn default() -> Self {
      Self {
         api_base_url:         "https://api.openai.com/v1".to_string(),
         api_key:              None,
         auth_scheme:          AuthScheme::Bearer,
         model:                "gpt-4o-mini".to_string(),
         temperature:          0.2,
         max_tokens:           1200,
         request_timeout_secs: None,
         connect_timeout_secs: 30,
         commit_limit:         100,
         output_file:          "CHANGELOG.generated.md".to_string(),
         site_dir:             "docs".to_string(),
         server_port:          3000,
         server_program:       None,
         prompt_variant:       "default".to_string(),
      }
   }
}

impl ChangelogConfig {
   /// Load config from default location (~/.config/llm-changelog/config.toml)
   /// Falls back to Default if the file doesn't exist. Environment variables
   /// override config file values:
   /// - `LLM_CHANGELOG_API_URL` overrides `api_base_url`
   /// - `LLM_CHANGELOG_API_KEY` overrides `api_key`
   /// - `LLM_CHANGELOG_MODEL` overrides `model`
   pub fn load() -> Result<Self> {
      let config_path = if let Ok(custom_path) = std::env::var("LLM_CHANGELOG_CONFIG") {
         PathBuf::from(custom_path)
      } else {
         Self::default_config_path().unwrap_or_default()
      };

      if config_path.exists() {
         Self::from_file(&config_path)
      } else {
         let mut config = Self::default();
         config.apply_env_overrides();
         Ok(config)
      }
   }

   /// Load config from specific file
   pub fn from_file(path: &Path) -> Result<Self> {
      let contents = std::fs::read_to_string(path).map_err(|e| {
         ChangelogError::ConfigError(format!("Failed to read {}: {e}", path.display()))
      })?;
      let mut config = Self::from_toml(&contents)?;
      config.apply_env_overrides();
      Ok(config)
   }

   fn from_toml(contents: &str) -> Result<Self> {
      toml::from_str(contents)
         .map_err(|e| ChangelogError::ConfigError(format!("Failed to parse config: {e}")))
   }

   fn apply_env_overrides(&mut self) {
      if let Ok(api_url) = std::env::var("LLM_CHANGELOG_API_URL") {
         self.api_base_url = api_url;
      }

      if let Ok(api_key) = std::env::var("LLM_CHANGELOG_API_KEY")
         && !api_key.trim().is_empty()
      {
         self.api_key = Some(api_key);
      }

      if let Ok(model) = std::env::var("LLM_CHANGELOG_MODEL") {
         self.model = model;
      }
   }

   /// Get default config path (platform-safe)
   /// Tries HOME (Unix/Linux/macOS) then USERPROFILE (Windows)
   pub fn default_config_path() -> Result<PathBuf> {
      if let Ok(home) = std::env::var("HOME") {
         return Ok(PathBuf::from(home).join(".config/llm-changelog/config.toml"));
      }

      if let Ok(home) = std::env::var("USERPROFILE") {
         return Ok(PathBuf::from(home).join(".config/llm-changelog/config.toml"));
      }

      Err(ChangelogError::ConfigError(
         "No home directory found (tried HOME and USERPROFILE)".to_string(),
      ))
   }

   /// Credential with surrounding whitespace stripped, if any is set
   pub fn credential(&self) -> Option<&str> {
      self
         .api_key
         .as_deref()
         .map(str::trim)
         .filter(|k| !k.is_empty())
   }
}
