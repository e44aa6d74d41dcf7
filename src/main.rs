use std::process::ExitCode;

use clap::Parser;
use llm_changelog::{
   Args, ChangelogConfig, Result, TerminalPrompter, pipeline,
   style::{self, icons},
};

/// Apply CLI overrides to config
fn apply_cli_overrides(config: &mut ChangelogConfig, args: &Args) {
   if let Some(port) = args.port {
      config.server_port = port;
   }
}

/// Load config from args or default
fn load_config_from_args(args: &Args) -> Result<ChangelogConfig> {
   if let Some(ref config_path) = args.config {
      ChangelogConfig::from_file(config_path)
   } else {
      ChangelogConfig::load()
   }
}

fn run(args: &Args) -> Result<()> {
   let mut config = load_config_from_args(args)?;
   apply_cli_overrides(&mut config, args);

   pipeline::run(args, &config, &mut TerminalPrompter)?;
   Ok(())
}

fn main() -> ExitCode {
   // A missing .env file is fine
   dotenvy::dotenv().ok();
   let args = Args::parse();

   match run(&args) {
      Ok(()) => ExitCode::SUCCESS,
      Err(e) => {
         eprintln!("{} {}", style::error(icons::ERROR), style::error(&e.to_string()));
         ExitCode::FAILURE
      },
   }
}
