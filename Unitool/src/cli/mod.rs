//! bg3-modders-unitool CLI - package a mod folder from the command line

pub mod progress;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::Level;

use crate::config::UnitoolConfig;
use crate::packaging::{ConsoleOutput, LspkPakBuilder, Packager, PackagingOutcome, PackagingRequest};

const EXAMPLES: &str = "\
Examples:
  Convert your mod and put it in your mods folder:
    bg3-modders-unitool ./MyModFolder \"~/AppData/Local/Larian Studios/Baldur's Gate 3/Mods\"

  Convert your mod and add it to a zip next to your folder:
    bg3-modders-unitool --zip ./MyModFolder";

#[derive(Parser, Debug)]
#[command(name = "bg3-modders-unitool", version)]
#[command(about = "Convert a BG3 mod folder into a .pak, optionally zipped with info.json", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Path to mod folder
    pub source: String,

    /// Path to destination folder (defaults to the mod folder's parent)
    pub destination: Option<String>,

    /// Whether to compress to zip file instead of leaving as .pak
    #[arg(short, long)]
    pub zip: bool,

    /// Compression method for PAK entries (lz4, zlib, none). Default: lz4
    #[arg(short, long)]
    pub compression: Option<String>,

    /// Root directory for temporary staging (defaults to the system temp dir)
    #[arg(long = "temp-dir", value_name = "PATH")]
    pub temp_dir: Option<PathBuf>,

    /// Suppress the progress spinner and informational output (warnings and errors still print)
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

/// Run the bg3-modders-unitool CLI
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let started = Instant::now();
    let mut console = ConsoleOutput::default();
    let result = execute(&cli, &mut console);

    let code = match &result {
        Ok(_) => {
            if !cli.quiet {
                console.info(progress::done_line(started.elapsed()));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !console.has_errors() {
                console.error(format!("Error: {e:#}"));
            }
            ExitCode::FAILURE
        }
    };

    progress::print_console(&console, cli.quiet);
    code
}

fn execute(cli: &Cli, console: &mut ConsoleOutput) -> anyhow::Result<PackagingOutcome> {
    let config = UnitoolConfig::load()?;
    let compression = config.compression(cli.compression.as_deref())?;
    let staging_root = config.staging_root(cli.temp_dir.clone());

    let request = PackagingRequest::resolve(&cli.source, cli.destination.as_deref(), cli.zip)?;
    tracing::debug!(?request, ?compression, staging_root = %staging_root.display(), "resolved");

    let spinner = (!cli.quiet && request.source().is_dir())
        .then(|| progress::pak_spinner(request.mod_name()));

    let mut builder = LspkPakBuilder::new(compression);
    if let Some(pb) = &spinner {
        let pb = pb.clone();
        builder = builder.with_progress(move |p| progress::update_spinner(&pb, p));
    }

    let outcome = Packager::new(staging_root)
        .with_pak_builder(builder)
        .run(&request, console);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(outcome?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_and_flags() {
        let cli = Cli::try_parse_from(["bg3-modders-unitool", "-z", "./MyMod", "/out"]).unwrap();
        assert_eq!(cli.source, "./MyMod");
        assert_eq!(cli.destination.as_deref(), Some("/out"));
        assert!(cli.zip);
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn test_destination_is_optional() {
        let cli =
            Cli::try_parse_from(["bg3-modders-unitool", "--zip", "--compression", "zlib", "MyMod"])
                .unwrap();
        assert!(cli.destination.is_none());
        assert_eq!(cli.compression.as_deref(), Some("zlib"));
    }

    #[test]
    fn test_source_is_required() {
        assert!(Cli::try_parse_from(["bg3-modders-unitool"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["bg3-modders-unitool", "-q", "-v", "MyMod"]).is_err());
    }
}
