//! List the built-in rules

use anyhow::Result;
use console::style;
use formrule::RuleRegistry;
use std::process::ExitCode;

pub fn list_rules() -> Result<ExitCode> {
    println!("{}", style("Built-in rules:").bold());
    for (token, name) in RuleRegistry::builtin().tokens() {
        println!("  {} {}", style(token).cyan(), style(format!("({name})")).dim());
    }
    Ok(ExitCode::SUCCESS)
}
