//! Coach Focus - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Coach Focus - coaching chat with a focus-tracking thread
#[derive(Parser, Debug)]
#[command(name = "coach-focus")]
#[command(version)]
#[command(about = "Coaching chat whose avatar follows the focused reply")]
pub struct Args {
    /// JSON transcript to open with (built-in conversation if omitted)
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Do not speak replies
    #[arg(long)]
    pub no_speech: bool,

    /// Show the focus diagnostics overlay on startup
    #[arg(long)]
    pub debug_overlay: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = coach_focus::config::load_config_with_precedence(args.config.clone())?;
        let merged = coach_focus::config::merge_config(config_file);
        let with_env = coach_focus::config::apply_env_overrides(merged);

        // Flags only override when passed
        let speech_override = args.no_speech.then_some(false);
        let debug_override = args.debug_overlay.then_some(true);

        coach_focus::config::apply_cli_overrides(with_env, speech_override, debug_override)
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = coach_focus::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    coach_focus::view::run_with_config(&config, args.transcript.as_deref())?;

    info!("Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["coach-focus", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["coach-focus", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["coach-focus"]);
        assert_eq!(args.transcript, None);
        assert!(!args.no_speech);
        assert!(!args.debug_overlay);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_transcript_flag() {
        let args = Args::parse_from(["coach-focus", "--transcript", "seed.json"]);
        assert_eq!(args.transcript, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_switches() {
        let args = Args::parse_from(["coach-focus", "--no-speech", "--debug-overlay"]);
        assert!(args.no_speech);
        assert!(args.debug_overlay);
    }

    #[test]
    fn test_config_flag() {
        let args = Args::parse_from(["coach-focus", "--config", "/tmp/coach.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/coach.toml")));
    }

    #[test]
    fn test_positional_arguments_are_rejected() {
        let result = Args::try_parse_from(["coach-focus", "extra"]);
        assert!(result.is_err());
    }
}
