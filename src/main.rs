use anyhow::{Context, Result};
use cachesweep::{default_patterns, load_sources, render_help, sweep};
use clap::{Parser, Subcommand};
use colored::Colorize;
use humansize::{format_size, BINARY};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove disposable build, test and cache artifacts from a working tree",
    long_about = None,
    disable_help_subcommand = true
)]
struct Args {
    /// Log individual deletions and suppressed errors to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove caches, bytecode, build output and packaging metadata
    Clean {
        /// Directory to sweep (defaults to current directory)
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Print the targets documented in the build definition
    Help {
        /// Build definition to read, may be repeated (defaults to ./Makefile)
        #[arg(long = "file", short = 'f')]
        files: Vec<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_clean(root: &Path) -> Result<()> {
    let patterns = default_patterns().context("Failed to load sweep patterns")?;

    println!("Cleaning caches and build artifacts...");

    let report = sweep(root, &patterns);
    tracing::debug!(suppressed = report.suppressed_errors, "sweep finished");

    println!(
        "{} Removed {} {} ({})",
        "Clean complete.".green().bold(),
        report.removed,
        if report.removed == 1 { "entry" } else { "entries" },
        format_size(report.reclaimed_bytes, BINARY)
    );

    Ok(())
}

fn run_help(files: &[PathBuf]) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let sources = load_sources(&cwd, files);
    print!("{}", render_help(&sources));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.command {
        Command::Clean { root } => run_clean(root),
        Command::Help { files } => run_help(files),
    }
}
