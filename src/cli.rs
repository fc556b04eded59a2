use clap::Parser;
use std::path::PathBuf;

/// Scroll-driven credentials timeline with draggable cards
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Section JSON to display (default: built-in credentials)
    #[arg(short = 'd', long = "data", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Disable sparkle bursts and the reveal fade
    #[arg(short = 'r', long = "reduced-motion")]
    pub reduced_motion: bool,

    /// Enable debug logging to file (default: credentials-timeline.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    /// Log level for the verbosity count: warn, info, debug, then trace.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["credentials-timeline"]);
        assert!(args.data.is_none());
        assert!(!args.reduced_motion);
        assert!(args.log_file.is_none());
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "credentials-timeline",
            "--data",
            "cards.json",
            "--reduced-motion",
            "-vv",
            "--log",
        ]);
        assert_eq!(args.data, Some(PathBuf::from("cards.json")));
        assert!(args.reduced_motion);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn test_log_file_path() {
        let args = Args::parse_from(["credentials-timeline", "-l", "out.log", "-c", "/tmp/cfg"]);
        assert_eq!(args.log_file, Some(Some(PathBuf::from("out.log"))));
        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/cfg")));
    }
}
