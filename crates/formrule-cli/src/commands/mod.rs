//! CLI commands

mod check;
mod rules;

pub use check::{check, CheckArgs};
pub use rules::list_rules;
