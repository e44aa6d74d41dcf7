//! End-to-end changelog run: range → history → completion → site → server

use std::path::{Path, PathBuf};

use crate::{
   api::{self, ChangelogGenerator},
   config::ChangelogConfig,
   error::{ChangelogError, Result},
   git::{GitCli, History},
   prompt::Prompter,
   range,
   serve::SitePublisher,
   site::{SiteOutput, SiteWriter},
   style,
   tokens::create_token_counter,
   types::{Args, HistoryText},
};

/// Run the whole pipeline against the repository containing `args.dir`.
///
/// The repository is located before anything is asked, so running outside a
/// work tree fails without prompting.
pub fn run(args: &Args, config: &ChangelogConfig, prompter: &mut dyn Prompter) -> Result<SiteOutput> {
   let git = GitCli::discover(&args.dir)?;
   let output = generate(&git, git.root(), args, config, prompter)?;

   if !args.no_serve {
      SitePublisher::new(git.root(), &output.site_dir, config.server_port)
         .with_program(config.server_program.as_ref().map(PathBuf::from))
         .publish_or_warn();
   }

   Ok(output)
}

/// Everything up to and including writing the site; no server is started
pub fn generate(
   history: &dyn History,
   root: &Path,
   args: &Args,
   config: &ChangelogConfig,
   prompter: &mut dyn Prompter,
) -> Result<SiteOutput> {
   let strategy = range::choose_strategy(prompter)?;
   let range = range::resolve_range(strategy, history, prompter, config.commit_limit)?;

   style::print_info(&format!("Collecting history for {}", style::revision(&range.to_string())));
   let history_text = history.diff_summary(&range)?;

   let api_key = resolve_credential(config, prompter)?;
   let generator = ChangelogGenerator::new(config, api_key)?;
   let prompt = generator.build_prompt(&range, &history_text)?;

   let counter = create_token_counter(config);
   style::print_info(&format!(
      "Prompt is ~{} tokens for model {}",
      counter.count(&prompt),
      style::model(&config.model)
   ));

   if let Some(debug_dir) = &args.debug_output {
      save_debug_output(debug_dir, &history_text, &prompt);
   }

   let markdown = style::with_spinner_result(
      &format!("{} Generating changelog...", style::icons::ROBOT),
      || generator.generate(&prompt),
   )?;

   let missing = api::missing_sections(&markdown);
   if !missing.is_empty() {
      style::warn(&format!(
         "Generated changelog is missing section(s): {}; writing it as returned",
         missing.join(", ")
      ));
   }

   let output = SiteWriter::new(root, config).write(&markdown)?;
   print_result(&markdown, &output);
   Ok(output)
}

/// Configured key, or ask for one with masked input
fn resolve_credential(config: &ChangelogConfig, prompter: &mut dyn Prompter) -> Result<String> {
   if let Some(key) = config.credential() {
      return Ok(key.to_string());
   }

   let key = prompter.read_secret("API key for the completion service")?;
   let key = key.trim();
   if key.is_empty() {
      return Err(ChangelogError::MissingCredential);
   }
   Ok(key.to_string())
}

fn save_debug_output(debug_dir: &Path, history: &HistoryText, prompt: &str) {
   let saved = std::fs::create_dir_all(debug_dir)
      .and_then(|()| std::fs::write(debug_dir.join("history.md"), history.as_str()))
      .and_then(|()| std::fs::write(debug_dir.join("prompt.md"), prompt));
   if let Err(e) = saved {
      style::warn(&format!("Failed to write debug output to {}: {e}", debug_dir.display()));
   }
}

fn print_result(markdown: &str, output: &SiteOutput) {
   let width = style::term_width();
   println!("\n{}", style::section_header("Generated Changelog", width));
   println!("{}", markdown.trim_end());
   println!("{}", style::separator(width));

   println!(
      "{} {} {}",
      style::success(style::icons::SAVE),
      style::success("Wrote"),
      style::bold(&output.changelog_path.display().to_string())
   );
   let index_note = if output.index_created { "created" } else { "kept" };
   println!(
      "  {} {} (index.html {index_note})",
      style::icons::ARROW,
      style::dim(&output.site_dir.display().to_string())
   );
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{prompt::ScriptedPrompter, testing::FakeHistory, types::TagInfo};

   fn tagged() -> FakeHistory {
      FakeHistory {
         tags: vec![
            TagInfo { name: "v1.1.0".to_string(), date: String::new() },
            TagInfo { name: "v1.0.0".to_string(), date: String::new() },
         ],
         name_status: "A\ta.txt\n".to_string(),
         ..Default::default()
      }
   }

   #[test]
   fn test_configured_credential_skips_prompt() {
      let config = ChangelogConfig { api_key: Some("sk-test".to_string()), ..Default::default() };
      let mut prompter = ScriptedPrompter::default();
      assert_eq!(resolve_credential(&config, &mut prompter).unwrap(), "sk-test");
      assert!(prompter.asked.is_empty());
   }

   #[test]
   fn test_prompted_credential() {
      let config = ChangelogConfig::default();
      let mut prompter = ScriptedPrompter::new(["  sk-typed  "]);
      assert_eq!(resolve_credential(&config, &mut prompter).unwrap(), "sk-typed");
   }

   #[test]
   fn test_blank_prompted_credential() {
      let config = ChangelogConfig::default();
      let mut prompter = ScriptedPrompter::new([""]);
      assert!(matches!(
         resolve_credential(&config, &mut prompter),
         Err(ChangelogError::MissingCredential)
      ));
   }

   #[test]
   fn test_missing_credential_stops_before_writing() {
      let root = tempfile::tempdir().unwrap();
      let config = ChangelogConfig::default();
      let mut prompter = ScriptedPrompter::new(["Between two tags", "v1.0.0", "v1.1.0", " "]);

      let err =
         generate(&tagged(), root.path(), &Args::default(), &config, &mut prompter).unwrap_err();
      assert!(matches!(err, ChangelogError::MissingCredential));
      assert!(!root.path().join("CHANGELOG.generated.md").exists());
   }

   #[test]
   fn test_invalid_selection_propagates() {
      let root = tempfile::tempdir().unwrap();
      let config = ChangelogConfig::default();
      let mut prompter = ScriptedPrompter::new(["Between two tags", "v1.0.0", "v1.0.0"]);

      let err =
         generate(&tagged(), root.path(), &Args::default(), &config, &mut prompter).unwrap_err();
      assert!(matches!(err, ChangelogError::InvalidSelection(_)));
   }
}
