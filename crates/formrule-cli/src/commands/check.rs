//! Check command: validate data against a rule-set document

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use console::{style, Emoji};
use formrule::{FieldData, RuleSet, ValidationErrors, Validator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "+ ");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Exit status when the data failed validation.
const EXIT_INVALID: u8 = 1;

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule-set document (JSON with `rules` and optional `messages`)
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Data as a query string, e.g. `age=3&tag=a&tag=b`
    #[arg(short, long, conflicts_with = "data", required_unless_present = "data")]
    pub query: Option<String>,

    /// Data as a JSON file mapping field to a string or list of strings
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn check(args: CheckArgs) -> Result<ExitCode> {
    let rule_set = RuleSet::from_path(&args.rules)?;
    let data = match (&args.query, &args.data) {
        (Some(query), _) => parse_query(query)?,
        (None, Some(path)) => load_data(path)?,
        (None, None) => bail!("either --query or --data is required"),
    };
    tracing::debug!(fields = data.len(), rules = rule_set.rules.len(), "checking data");

    let errors = rule_set.validate(&Validator::builtin(), &data)?;

    match args.format {
        OutputFormat::Text => print_text(&errors),
        OutputFormat::Json => print_json(&errors)?,
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}

/// Repeated keys collect into one field with several values.
fn parse_query(query: &str) -> Result<FieldData> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).context("invalid query string")?;

    let mut data = FieldData::new();
    for (field, value) in pairs {
        data.entry(field).or_default().push(value);
    }
    Ok(data)
}

fn load_data(path: &Path) -> Result<FieldData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&json).with_context(|| format!("invalid JSON in `{}`", path.display()))?;

    let Some(object) = value.as_object() else {
        bail!("data must be a JSON object of field to string or list of strings");
    };

    let mut data = FieldData::new();
    for (field, values) in object {
        let values = match values {
            serde_json::Value::String(value) => vec![value.clone()],
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .with_context(|| format!("field `{field}` must hold strings only"))?,
            _ => bail!("field `{field}` must be a string or a list of strings"),
        };
        data.insert(field.clone(), values);
    }
    Ok(data)
}

fn print_text(errors: &ValidationErrors) {
    let Some(primary) = errors.primary() else {
        println!("{} {}", CHECK, style("all fields valid").green());
        return;
    };

    for entry in errors {
        println!("{} {}", ERROR, style(&entry.field).bold());
        for (key, message) in &entry.errors {
            println!("    {} {}", style(format!("{key}:")).dim(), message);
        }
    }
    println!();
    println!("{} {}", style("error:").red().bold(), primary);
}

fn print_json(errors: &ValidationErrors) -> Result<()> {
    let output = if errors.is_empty() {
        serde_json::json!({ "valid": true })
    } else {
        serde_json::to_value(errors.to_api_error())?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
