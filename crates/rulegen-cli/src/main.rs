#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use rulegen_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rulegen")]
#[command(author, version, about = "Generate build targets for TypeScript/JavaScript trees", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Generate targets for every directory under the tree root
    Generate {
        /// Root of the tree; holds package.json (defaults to the working directory)
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,

        /// Only visit these directories (relative to the root)
        dirs: Vec<PathBuf>,

        /// Write BUILD.bazel into directories that have no build file yet
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Some(Commands::Generate { root, dirs, write }) => {
            let root = root.map_or_else(|| cwd.clone(), |r| cwd.join(r));
            let config = Config::new(root)
                .with_verbosity(cli.verbose)
                .with_json_logs(cli.json);
            logging::init(config.verbosity, config.json_logs);
            commands::generate::run(&config, &dirs, write, cli.json)
        }
        Some(Commands::Version) | None => commands::version::run(cli.json),
    }
}
