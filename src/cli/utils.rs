use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::api::PageMeta;
use crate::cli::OutputFormat;
use crate::drawer::SubmitOutcome;
use crate::mutation::{AssumeYes, Confirm, MutationOutcome};
use crate::resources::display_name;
use crate::settings::get_path;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            match data {
                Some(Value::Object(fields)) => {
                    if let Some(obj) = response.as_object_mut() {
                        obj.extend(fields);
                    }
                }
                Some(Value::Null) | None => {}
                Some(other) => response["data"] = other,
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Render one table cell; `key` may be a dotted path into nested objects.
pub fn cell(row: &Value, key: &str) -> String {
    match get_path(row, key) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(v @ Value::Object(_)) => {
            let name = display_name(v);
            if name.is_empty() { v.to_string() } else { name }
        }
        Some(Value::Array(items)) => items.len().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Output rows as a table (text) or as `{collection: [...], meta}` (JSON).
pub fn output_rows(
    output_format: &OutputFormat,
    collection_name: &str,
    columns: &[(&str, &str)],
    rows: &[&Value],
    meta: Option<&PageMeta>,
    empty_message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut body = json!({ collection_name: rows });
            if let Some(meta) = meta {
                body["meta"] = serde_json::to_value(meta)?;
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("{}", empty_message);
                return Ok(());
            }
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| columns.iter().map(|(_, key)| cell(row, key)).collect())
                .collect();
            let widths: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(i, (header, _))| {
                    cells.iter().map(|r| r[i].chars().count()).chain([header.len()]).max().unwrap_or(0)
                })
                .collect();

            let line = |values: Vec<&str>| {
                values
                    .iter()
                    .zip(&widths)
                    .map(|(v, w)| format!("{:<width$}", v, width = *w))
                    .collect::<Vec<_>>()
                    .join("  ")
            };
            println!("{}", line(columns.iter().map(|(h, _)| *h).collect()));
            println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
            for row in &cells {
                println!("{}", line(row.iter().map(String::as_str).collect()));
            }
            if let Some(meta) = meta {
                println!("\n{}", meta.summary());
            }
        }
    }
    Ok(())
}

/// Output a single record: pretty JSON, or `key: value` lines.
pub fn output_record(output_format: &OutputFormat, record_name: &str, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ record_name: record }))?);
        }
        OutputFormat::Text => match record {
            Value::Object(fields) => {
                let width = fields.keys().map(String::len).max().unwrap_or(0);
                for (key, value) in fields {
                    let shown = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    println!("{:<width$}  {}", key, shown, width = width);
                }
            }
            other => println!("{}", serde_json::to_string_pretty(other)?),
        },
    }
    Ok(())
}

/// Confirmation on the controlling terminal
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

pub fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}

/// A secret from the flag, then the environment, then a prompt.
pub fn read_secret(label: &str, provided: Option<String>, env_var: &str) -> anyhow::Result<String> {
    if let Some(value) = provided.filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Ok(value);
        }
    }
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut value = String::new();
    io::stdin().lock().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Report a drawer submit, turning failures into command errors.
pub fn report_submit(output_format: &OutputFormat, outcome: SubmitOutcome, message: &str) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Saved(body) => output_success(output_format, message, body),
        SubmitOutcome::Invalid(msg) | SubmitOutcome::Failed(msg) => Err(anyhow::anyhow!(msg)),
        SubmitOutcome::Busy => Err(anyhow::anyhow!("A save is already in progress")),
    }
}

pub fn report_mutation(output_format: &OutputFormat, outcome: MutationOutcome, message: &str) -> anyhow::Result<()> {
    match outcome {
        MutationOutcome::Done(body) => output_success(output_format, message, body),
        MutationOutcome::Declined => output_success(output_format, "Cancelled", None),
        MutationOutcome::Busy => Err(anyhow::anyhow!("Another action on this record is in progress")),
    }
}
