//! `formrule` binary entry point.

mod cli;
mod commands;

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status for setup problems: bad rule set, unreadable input.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("FORMRULE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    match cli::Cli::parse().execute() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}
