use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
   config::{AuthScheme, ChangelogConfig},
   error::{ChangelogError, Result},
   style, templates,
   types::{HistoryText, Range},
};

/// Section headings the prompt asks the model to produce
pub const REQUIRED_SECTIONS: [&str; 3] = ["What's new", "Impact", "Changes"];

#[derive(Debug, Serialize)]
struct Message<'a> {
   role:    &'a str,
   content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
   #[serde(skip_serializing_if = "Option::is_none")]
   model:       Option<&'a str>,
   messages:    Vec<Message<'a>>,
   temperature: f32,
   max_tokens:  u32,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
   #[serde(default)]
   content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
   message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
   #[serde(default)]
   choices: Vec<Choice>,
}

/// Turns history text into a changelog with one chat-completion call
pub struct ChangelogGenerator<'a> {
   config:  &'a ChangelogConfig,
   api_key: String,
   client:  reqwest::blocking::Client,
}

impl<'a> ChangelogGenerator<'a> {
   /// Build a generator; the credential is passed in explicitly
   pub fn new(config: &'a ChangelogConfig, api_key: impl Into<String>) -> Result<Self> {
      let api_key = api_key.into();
      if api_key.trim().is_empty() {
         return Err(ChangelogError::MissingCredential);
      }

      let client = reqwest::blocking::Client::builder()
         .timeout(config.request_timeout_secs.map(Duration::from_secs))
         .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
         .build()?;

      Ok(Self { config, api_key: api_key.trim().to_string(), client })
   }

   /// Fixed instructions followed by the literal history text
   pub fn build_prompt(&self, range: &Range, history: &HistoryText) -> Result<String> {
      templates::render_changelog_prompt(&self.config.prompt_variant, range, history)
   }

   /// Send `prompt` as a single user message and return the generated text
   pub fn generate(&self, prompt: &str) -> Result<String> {
      let model = self.config.model.trim();
      let request = CompletionRequest {
         model:       (!model.is_empty()).then_some(model),
         messages:    vec![Message { role: "user", content: prompt }],
         temperature: self.config.temperature,
         max_tokens:  self.config.max_tokens,
      };

      let url = format!("{}/chat/completions", self.config.api_base_url.trim_end_matches('/'));
      let request_builder = self
         .client
         .post(url)
         .header("content-type", "application/json");
      let request_builder = match self.config.auth_scheme {
         AuthScheme::Bearer => {
            request_builder.header("Authorization", format!("Bearer {}", self.api_key))
         },
         AuthScheme::ApiKey => request_builder.header("api-key", &self.api_key),
      };

      style::trace(&format!("Sending {} byte prompt", prompt.len()));

      let response = request_builder.json(&request).send()?;
      let status = response.status();
      let body = response
         .text()
         .unwrap_or_else(|_| "Unknown error".to_string());

      style::trace(&format!("Completion service answered HTTP {status} ({} bytes)", body.len()));

      interpret_response(status.as_u16(), &body)
   }
}

/// Map an HTTP status and body to the generated changelog or an error
fn interpret_response(status: u16, body: &str) -> Result<String> {
   if !(200..300).contains(&status) {
      return Err(ChangelogError::CompletionServiceError { status, body: body.to_string() });
   }

   let api_response: ApiResponse = serde_json::from_str(body)?;
   let content = api_response
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .unwrap_or_default();

   if content.trim().is_empty() {
      return Err(ChangelogError::EmptyCompletion);
   }

   Ok(content)
}

/// Requested section headings that do not appear in `markdown`
pub fn missing_sections(markdown: &str) -> Vec<&'static str> {
   let headings: Vec<String> = markdown
      .lines()
      .map(str::trim)
      .filter(|line| line.starts_with('#'))
      .map(|line| line.trim_start_matches('#').trim().to_lowercase())
      .collect();

   REQUIRED_SECTIONS
      .into_iter()
      .filter(|section| !headings.iter().any(|h| *h == section.to_lowercase()))
      .collect()
}
