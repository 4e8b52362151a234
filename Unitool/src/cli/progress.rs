//! CLI progress display and final console printing

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use unilarian::pak::{PakPhase, PakProgress};

use crate::packaging::{ConsoleLevel, ConsoleLine, ConsoleOutput};

/// Package - for packing operations
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Spinner style for PAK creation
///
/// Format: `📦 [MyMod] ⠋ [3/12] Public/MyMod/Stats/Armor.txt`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.bold.dim} {spinner:.cyan} {wide_msg}")
        .expect("valid template")
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
}

/// Spinner shown on stderr while `mod_name` is packed
#[must_use]
pub fn pak_spinner(mod_name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_prefix(format!("{PACKAGE}[{mod_name}]"));
    pb.set_message(PakPhase::ScanningFiles.as_str());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Reflect a PAK progress event on the spinner
pub fn update_spinner(pb: &ProgressBar, progress: &PakProgress) {
    match (&progress.phase, &progress.current_file) {
        (PakPhase::CompressingFiles, Some(file)) => {
            pb.set_message(format!("[{}/{}] {file}", progress.current, progress.total));
        }
        (phase, _) => pb.set_message(phase.as_str()),
    }
}

/// Completion line: `✨ Done in 2s`
pub fn done_line(elapsed: Duration) -> String {
    format!("{SPARKLE}Done in {}", HumanDuration(elapsed))
}

/// Lines to print; `quiet` keeps only warnings and errors
pub fn visible_lines(console: &ConsoleOutput, quiet: bool) -> impl Iterator<Item = &ConsoleLine> {
    console
        .lines()
        .iter()
        .filter(move |line| !quiet || line.level != ConsoleLevel::Info)
}

/// Print the buffered run output: info to stdout, warnings and errors to stderr
pub fn print_console(console: &ConsoleOutput, quiet: bool) {
    for line in visible_lines(console, quiet) {
        match line.level {
            ConsoleLevel::Info => println!("{}", line.message),
            ConsoleLevel::Warning => {
                eprintln!("{} {}", style("Warning:").yellow().bold(), line.message);
            }
            ConsoleLevel::Error => eprintln!("{}", style(&line.message).red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConsoleOutput {
        let mut console = ConsoleOutput::default();
        console.warn("Missing UUID in meta.lsx");
        console.info("Packaged MyMod -> /out/MyMod.pak");
        console.error("Error: failed to process mod MyMod");
        console
    }

    #[test]
    fn test_quiet_hides_info_lines() {
        let console = sample();
        let levels: Vec<ConsoleLevel> = visible_lines(&console, true).map(|l| l.level).collect();
        assert_eq!(levels, vec![ConsoleLevel::Warning, ConsoleLevel::Error]);
    }

    #[test]
    fn test_default_shows_everything() {
        let console = sample();
        assert_eq!(visible_lines(&console, false).count(), 3);
    }
}
