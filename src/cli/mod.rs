//! CLI interface using clap.
//!
//! One positional output directory plus options locating the Evernote data.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;

use crate::domain::AppConfig;

/// Evernote Export - Dump Evernote desktop notes into plain-text files, one
/// folder per notebook.
#[derive(Parser, Debug)]
#[command(name = "evernote-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Existing directory receiving the exported notes.
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Evernote account directory (the one containing Evernote.sql).
    #[arg(long, value_name = "PATH", env = "EVERNOTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Account id under Evernote's data directory.
    #[arg(long, value_name = "ID")]
    pub account: Option<String>,

    /// Path to a specific configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Render dates in UTC instead of local time.
    #[arg(long)]
    pub utc: bool,

    /// Suppress per-note progress and the final summary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// Export into an existing output directory.
    Run { cli: Cli, output_dir: PathBuf },
    /// Print usage and exit successfully.
    Usage,
}

impl Cli {
    /// Parses arguments. Anything that does not name an existing output
    /// directory, including stray arguments and unknown options, is a
    /// request for usage.
    ///
    /// # Errors
    /// Returns the clap error for `--help` and `--version`, which the caller
    /// displays with `exit`.
    pub fn from_args<I, T>(args: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => {
                let output_dir = cli.output_dir().map(Path::to_path_buf);
                Ok(match output_dir {
                    Some(output_dir) => Invocation::Run { cli, output_dir },
                    None => Invocation::Usage,
                })
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayVersion
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                Err(e)
            }
            Err(_) => Ok(Invocation::Usage),
        }
    }

    /// The output directory, if given and an existing directory.
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref().filter(|dir| dir.is_dir())
    }

    /// Overlays command-line settings on the file configuration.
    #[must_use]
    pub fn merge(&self, file: AppConfig) -> AppConfig {
        AppConfig {
            data_dir: self.data_dir.clone().or(file.data_dir),
            account: self.account.clone().or(file.account),
            utc: self.utc || file.utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_out_dir_is_accepted() {
        let cli = Cli::try_parse_from(["evernote-export"]).unwrap();
        assert!(cli.out_dir.is_none());
        assert!(cli.output_dir().is_none());
    }

    #[test]
    fn test_out_dir_must_be_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let cli = Cli::try_parse_from(["evernote-export", file.to_str().unwrap()]).unwrap();
        assert!(cli.output_dir().is_none());

        let cli = Cli::try_parse_from(["evernote-export", dir.path().to_str().unwrap()]).unwrap();
        assert_eq!(cli.output_dir(), Some(dir.path()));
    }

    #[test]
    fn test_extra_positional_prints_usage() {
        let invocation = Cli::from_args(["evernote-export", "a", "b"]).unwrap();
        assert!(matches!(invocation, Invocation::Usage));
    }

    #[test]
    fn test_unknown_option_prints_usage() {
        let dir = tempdir().unwrap();
        let invocation =
            Cli::from_args(["evernote-export", dir.path().to_str().unwrap(), "--bogus"]).unwrap();
        assert!(matches!(invocation, Invocation::Usage));
    }

    #[test]
    fn test_missing_or_bad_out_dir_prints_usage() {
        assert!(matches!(
            Cli::from_args(["evernote-export"]).unwrap(),
            Invocation::Usage
        ));
        assert!(matches!(
            Cli::from_args(["evernote-export", "/no/such/dir"]).unwrap(),
            Invocation::Usage
        ));
    }

    #[test]
    fn test_existing_out_dir_runs() {
        let dir = tempdir().unwrap();
        match Cli::from_args(["evernote-export", dir.path().to_str().unwrap(), "-q"]).unwrap() {
            Invocation::Run { cli, output_dir } => {
                assert_eq!(output_dir, dir.path());
                assert!(cli.quiet);
            }
            Invocation::Usage => panic!("expected a run"),
        }
    }

    #[test]
    fn test_help_and_version_are_passed_through() {
        let err = Cli::from_args(["evernote-export", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::from_args(["evernote-export", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let cli = Cli::try_parse_from([
            "evernote-export",
            "out",
            "--data-dir",
            "/cli/data",
            "-vv",
        ])
        .unwrap();
        let file = AppConfig {
            data_dir: Some(PathBuf::from("/file/data")),
            account: Some("42".into()),
            utc: true,
        };

        let merged = cli.merge(file);

        assert_eq!(merged.data_dir, Some(PathBuf::from("/cli/data")));
        assert_eq!(merged.account.as_deref(), Some("42"));
        assert!(merged.utc);
        assert_eq!(cli.verbose, 2);
    }
}
