//! Evernote Export - Dump notes from the Evernote desktop app into text files.
//!
//! This tool reads Evernote's local `SQLite` store and ENML content files,
//! writing one `<note_id>.txt` per note into a folder named after its
//! notebook. Each file starts with `@Title:`, `@Date:` and (when tagged)
//! `@Tags:` lines, followed by the note body as plain text.
//!
//!   evernote-export ~/notes-export
//!   evernote-export ~/notes-export --data-dir /backup/Evernote/data/101370 --utc

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::Path;

use clap::CommandFactory;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{format_failures_table, format_stats, Exporter};
use cli::{Cli, Invocation};
use domain::ExportConfig;
use infrastructure::{load_config, resolve_data_dir};

fn main() {
    // Anything but a single existing output directory is a no-op, not an error
    let (cli, output_dir) = match Cli::from_args(std::env::args_os()) {
        Ok(Invocation::Run { cli, output_dir }) => (cli, output_dir),
        Ok(Invocation::Usage) => {
            println!("{}", Cli::command().render_usage());
            return;
        }
        Err(e) => e.exit(),
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli, &output_dir) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: &Cli, output_dir: &Path) -> domain::Result<()> {
    let settings = cli.merge(load_config(cli.config.as_deref())?);
    let data_dir = resolve_data_dir(settings.data_dir, settings.account.as_deref())?;
    tracing::info!("Using Evernote data at {}", data_dir.display());

    let config = ExportConfig {
        output_dir: output_dir.to_path_buf(),
        data_dir,
        utc: settings.utc,
        quiet: cli.quiet,
    };

    // Store connection is dropped with the exporter, on success or error
    let stats = Exporter::open(config)?.run()?;

    if !cli.quiet {
        println!();
        println!("{}", format_stats(&stats));
        if !stats.failures.is_empty() {
            println!();
            println!("{}", format_failures_table(&stats.failures));
        }
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
