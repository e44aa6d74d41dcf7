//! Terminal output for the changelog run: palette, status lines, spinner.
//!
//! Colors are used only when stdout supports them and `NO_COLOR` is unset.

use std::{
   io::{self, IsTerminal, Write},
   sync::{OnceLock, mpsc},
   thread,
   time::Duration,
};

use owo_colors::OwoColorize;

static COLOR_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if colors should be used (cached on first call).
pub fn colors_enabled() -> bool {
   *COLOR_ENABLED.get_or_init(|| {
      // https://no-color.org/
      if std::env::var_os("NO_COLOR").is_some() {
         return false;
      }
      supports_color::on(supports_color::Stream::Stdout).is_some_and(|level| level.has_basic)
   })
}

/// Whether `LLM_CHANGELOG_VERBOSE` asks for request tracing
pub fn verbose_enabled() -> bool {
   std::env::var_os("LLM_CHANGELOG_VERBOSE").is_some()
}

fn paint(s: &str, f: impl FnOnce(&str) -> String) -> String {
   if colors_enabled() { f(s) } else { s.to_string() }
}

// === Palette ===

/// Completed actions (green + bold).
pub fn success(s: &str) -> String {
   paint(s, |s| s.green().bold().to_string())
}

/// Non-fatal problems (yellow).
pub fn warning(s: &str) -> String {
   paint(s, |s| s.yellow().to_string())
}

/// Fatal failures (red + bold).
pub fn error(s: &str) -> String {
   paint(s, |s| s.red().bold().to_string())
}

pub fn dim(s: &str) -> String {
   paint(s, |s| s.dimmed().to_string())
}

pub fn bold(s: &str) -> String {
   paint(s, |s| s.bold().to_string())
}

/// Model names (magenta).
pub fn model(s: &str) -> String {
   paint(s, |s| s.magenta().to_string())
}

/// Tags, hashes and ranges (yellow + bold).
pub fn revision(s: &str) -> String {
   paint(s, |s| s.yellow().bold().to_string())
}

// === Status lines ===

/// Print a warning on stderr after clearing a possible spinner line.
pub fn warn(msg: &str) {
   print!("\r\x1b[K");
   io::stdout().flush().ok();
   eprintln!("{} {}", warning(icons::WARNING), warning(msg));
}

/// Print a progress note on stderr.
pub fn print_info(msg: &str) {
   if io::stderr().is_terminal() && colors_enabled() {
      eprintln!("\r\x1b[K{} {msg}", icons::INFO.cyan());
   } else {
      eprintln!("{} {msg}", icons::INFO);
   }
}

/// Print a trace line, only when verbose output is enabled.
pub fn trace(msg: &str) {
   if verbose_enabled() {
      eprintln!("{} {}", dim(icons::ARROW), dim(msg));
   }
}

/// Terminal width, capped at 120 columns.
pub fn term_width() -> usize {
   terminal_size::terminal_size()
      .map_or(80, |(w, _)| w.0 as usize)
      .min(120)
}

const HORIZONTAL: char = '\u{2500}';

fn rule(len: usize) -> String {
   HORIZONTAL.to_string().repeat(len)
}

pub fn separator(width: usize) -> String {
   dim(&rule(width))
}

/// Title centered between two rules, e.g. `─── Generated Changelog ───`.
pub fn section_header(title: &str, width: usize) -> String {
   let side = rule(width.saturating_sub(title.chars().count() + 2) / 2);
   format!("{} {} {}", dim(&side), bold(title), dim(&side))
}

pub mod icons {
   pub const SUCCESS: &str = "\u{2713}";
   pub const WARNING: &str = "\u{26A0}";
   pub const ERROR: &str = "\u{2717}";
   pub const INFO: &str = "\u{2139}";
   pub const ARROW: &str = "\u{2192}";
   pub const ROBOT: &str = "\u{1F916}";
   pub const SAVE: &str = "\u{1F4BE}";
}

// === Spinner ===

const SPINNER_FRAMES: &[char] = &[
   '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
   '\u{2807}', '\u{280F}',
];

/// Run `f` behind a spinner and finish the line with a check or a cross.
///
/// Without color support the message is printed once and `f` runs plainly.
pub fn with_spinner_result<F, T, E>(message: &str, f: F) -> Result<T, E>
where
   F: FnOnce() -> Result<T, E>,
{
   if !colors_enabled() {
      println!("{message}");
      return f();
   }

   let (done_tx, done_rx) = mpsc::channel::<bool>();
   let msg = message.to_string();

   let spinner = thread::spawn(move || {
      for frame in SPINNER_FRAMES.iter().cycle() {
         match done_rx.try_recv() {
            Ok(ok) => {
               let icon = if ok {
                  icons::SUCCESS.green().to_string()
               } else {
                  icons::ERROR.red().to_string()
               };
               println!("\r\x1b[K{icon} {msg}");
               break;
            },
            Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {},
         }
         print!("\r{} {msg}", frame.cyan());
         io::stdout().flush().ok();
         thread::sleep(Duration::from_millis(80));
      }
   });

   let result = f();
   done_tx.send(result.is_ok()).ok();
   spinner.join().ok();
   result
}
