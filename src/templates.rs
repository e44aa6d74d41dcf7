use std::{path::PathBuf, sync::LazyLock};

use parking_lot::Mutex;
use rust_embed::RustEmbed;
use tera::{Context, Tera};

use crate::{
   error::{ChangelogError, Result},
   types::{HistoryText, Range},
};

/// Embedded prompts folder (compiled into binary)
#[derive(RustEmbed)]
#[folder = "prompts/"]
struct Prompts;

/// Global Tera instance for template rendering (wrapped in Mutex for mutable
/// access)
static TERA: LazyLock<Mutex<Tera>> = LazyLock::new(|| {
   let mut tera = Tera::default();
   // Prompts are Markdown, not HTML
   tera.autoescape_on(vec![]);
   Mutex::new(tera)
});

/// Determine user prompts directory (~/.llm-changelog/prompts/) if a home dir
/// exists.
fn get_user_prompts_dir() -> Option<PathBuf> {
   std::env::var("HOME")
      .or_else(|_| std::env::var("USERPROFILE"))
      .ok()
      .map(|home| PathBuf::from(home).join(".llm-changelog").join("prompts"))
}

/// Load template content, preferring a user override over the embedded copy
fn load_template_file(category: &str, variant: &str) -> Result<String> {
   if let Some(prompts_dir) = get_user_prompts_dir() {
      let template_path = prompts_dir.join(category).join(format!("{variant}.md"));
      if template_path.exists() {
         return std::fs::read_to_string(&template_path).map_err(|e| {
            ChangelogError::TemplateError(format!(
               "Failed to read template file {}: {e}",
               template_path.display()
            ))
         });
      }
   }

   let embedded_key = format!("{category}/{variant}.md");
   if let Some(bytes) = Prompts::get(&embedded_key) {
      return std::str::from_utf8(bytes.data.as_ref())
         .map(ToString::to_string)
         .map_err(|e| {
            ChangelogError::TemplateError(format!(
               "Embedded template {embedded_key} is not valid UTF-8: {e}"
            ))
         });
   }

   Err(ChangelogError::TemplateError(format!(
      "Template variant '{variant}' in category '{category}' not found as user override or \
       embedded default"
   )))
}

/// Render the changelog instructions for `range` and append the history.
///
/// The returned prompt always ends with the exact history text.
pub fn render_changelog_prompt(
   variant: &str,
   range: &Range,
   history: &HistoryText,
) -> Result<String> {
   let template_content = load_template_file("changelog", variant)?;

   let mut context = Context::new();
   context.insert("range", &range.to_string());

   let instructions = TERA
      .lock()
      .render_str(&template_content, &context)
      .map_err(|e| {
         ChangelogError::TemplateError(format!(
            "Failed to render changelog prompt template '{variant}': {e}"
         ))
      })?;

   Ok(format!("{}\n\n{history}", instructions.trim_end()))
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{history::format_history, types::RevisionRef};

   fn range() -> Range {
      Range::new(RevisionRef::new("v1.0.0"), RevisionRef::new("v1.1.0")).unwrap()
   }

   #[test]
   fn test_prompt_ends_with_history() {
      let history = format_history("- abc Alice\n  feat: add a", "A\ta.txt", " a.txt | 1 +");
      let prompt = render_changelog_prompt("default", &range(), &history).unwrap();
      assert!(prompt.ends_with(history.as_str()));
      assert!(prompt.contains("v1.0.0..v1.1.0"));
   }

   #[test]
   fn test_prompt_states_output_contract() {
      let history = format_history("", "", "");
      let prompt = render_changelog_prompt("default", &range(), &history).unwrap();
      assert!(prompt.contains("## What's new"));
      assert!(prompt.contains("## Impact"));
      assert!(prompt.contains("## Changes"));
   }

   #[test]
   fn test_unknown_variant() {
      let history = format_history("", "", "");
      let err =
         render_changelog_prompt("no-such-variant-xyz", &range(), &history).unwrap_err();
      assert!(matches!(err, ChangelogError::TemplateError(_)));
   }
}
