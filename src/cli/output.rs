//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{DocfieldArgs, OutputFormat};
use crate::error::Result;

/// Result structure for reading one field.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GetResult {
    pub path: String,
    pub value: Option<Value>,
}

/// Result structure for flattening a document.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FlattenResult {
    pub fields: BTreeMap<String, Value>,
}

/// Result structure for a write applied to a document.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WriteResult {
    pub fields_written: usize,
    pub document: Value,
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &DocfieldArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &DocfieldArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    Value::Object(fields) => {
                        println!("{key}:");
                        for (name, field) in fields {
                            println!("  {name}: {}", format_value(&field));
                        }
                    }
                    other => println!("{key}: {}", format_value(&other)),
                }
            }
        }
        other => println!("{}", format_value(&other)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &DocfieldArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => value.to_string(),
        Value::Null => "null".to_string(),
    }
}
