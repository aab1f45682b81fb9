use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tyval_common::logging::Verbosity;

/// Command-line interface for the tyval validator pipeline.
#[derive(Parser, Debug)]
#[command(name = "tyval", version, about = "Generates runtime value validators from annotated type declarations")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress all output below error level.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v for info, -vv for debug).
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl CliArgs {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Debug,
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scans a directory of annotated source files and writes a schema JSON file.
    Extract {
        /// Directory to scan recursively for annotated declarations.
        dir: PathBuf,
        /// Where to write the resulting schema JSON.
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },
    /// Reads a schema JSON file and writes the generated validator crate source.
    Emit {
        /// Path to a schema JSON file produced by `extract`.
        schema: PathBuf,
        /// Directory to write `schema.json` and `validators.rs` into.
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },
    /// Reads a JSON value from stdin and checks it against a named type in a schema.
    Check {
        /// Path to a schema JSON file.
        schema: PathBuf,
        /// Name of the asserted type to check the value against.
        type_name: String,
    },
}
