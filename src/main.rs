//! docx-splice CLI - split or merge DOCX files

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use docx_splice::{merge_docx_with, split_docx, Config, MergeOptions, SplitOptions};

#[derive(Parser)]
#[command(name = "docx-splice")]
#[command(version)]
#[command(about = "Split or merge DOCX files.", long_about = None)]
struct Cli {
    /// Print the operation report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a DOCX file.
    Split {
        /// Path of the DOCX file to split.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file prefix (default: split_part_)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Merge multiple DOCX files into one.
    Merge {
        /// List of DOCX files to merge.
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output file name (default: merged.docx)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            // Unknown commands get the help text, not an error
            print_help();
            return;
        }
        Err(e) => e.exit(),
    };

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Split { file, prefix }) => {
            let mut options = config.split_options();
            if let Some(prefix) = prefix {
                options.prefix = prefix;
            }
            cmd_split(&file, &options, cli.json)
        }
        Some(Commands::Merge { files, output }) => {
            let mut options = config.merge_options();
            if let Some(output) = output {
                options.output = output;
            }
            cmd_merge(&files, &options, cli.json)
        }
        None => {
            print_help();
            Ok(())
        }
    }
}

fn cmd_split(file: &Path, options: &SplitOptions, json: bool) -> Result<()> {
    let report = match split_docx(file, options) {
        Ok(report) => report,
        Err(e) if e.is_reportable() => {
            println!("Error: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Splitting complete - {} files were created.",
            report.files_created()
        );
    }

    Ok(())
}

fn cmd_merge(files: &[PathBuf], options: &MergeOptions, json: bool) -> Result<()> {
    let report = merge_docx_with(files, options, |skipped| {
        if !json {
            println!("{skipped}");
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Documents have been merged into {}.",
        report.output.display()
    );

    Ok(())
}
