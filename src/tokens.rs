//! Prompt size estimation.
//!
//! Uses tiktoken when the configured model has a known encoding and falls back
//! to a character estimate (4 chars ≈ 1 token). Only used for reporting; the
//! prompt is never truncated.

use std::fmt;

use tiktoken_rs::{CoreBPE, get_bpe_from_model};

use crate::config::ChangelogConfig;

/// Create a `TokenCounter` from config values.
pub fn create_token_counter(config: &ChangelogConfig) -> TokenCounter {
   TokenCounter::new(&config.model)
}

pub struct TokenCounter {
   model:    String,
   tiktoken: Option<CoreBPE>,
}

impl fmt::Debug for TokenCounter {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("TokenCounter")
         .field("model", &self.model)
         .field("has_tiktoken", &self.tiktoken.is_some())
         .finish()
   }
}

impl TokenCounter {
   pub fn new(model: &str) -> Self {
      Self { model: model.to_string(), tiktoken: get_bpe_from_model(model).ok() }
   }

   /// Count tokens for a text string.
   pub fn count(&self, text: &str) -> usize {
      if let Some(ref encoder) = self.tiktoken {
         encoder.encode_with_special_tokens(text).len()
      } else {
         text.len() / 4
      }
   }
}
