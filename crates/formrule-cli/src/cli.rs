//! CLI argument parsing

use crate::commands::{self, CheckArgs};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// formrule - validate form and query data against declarative rules
#[derive(Parser, Debug)]
#[command(name = "formrule")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate data against a rule-set document
    Check(CheckArgs),

    /// List the built-in rule names
    Rules,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Commands::Check(args) => commands::check(args),
            Commands::Rules => commands::list_rules(),
        }
    }
}
