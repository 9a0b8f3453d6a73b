//! Command implementations for the docfield CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::converter::json::{field_value_to_json, map_from_json_str, map_to_json};
use crate::document::{
    FieldPath, MapFieldPathValue, MapFieldValue, SetOptions, apply_set, apply_update,
};
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: DocfieldArgs) -> Result<()> {
    match &args.command {
        Command::Get(get_args) => {
            let result = get_field(get_args)?;
            output_result("Field value", &result, &args)
        }
        Command::Flatten(flatten_args) => {
            let result = flatten_document(flatten_args)?;
            output_result("Flattened fields", &result, &args)
        }
        Command::Merge(merge_args) => {
            let result = merge_document(merge_args)?;
            output_result("Merged document", &result, &args)
        }
        Command::Update(update_args) => {
            let result = update_document(update_args)?;
            output_result("Updated document", &result, &args)
        }
    }
}

/// Read the value at a dotted path.
pub fn get_field(args: &GetArgs) -> Result<GetResult> {
    let document = load_document(&args.file)?;
    let path = FieldPath::from_dot_separated(&args.path)?;

    let value = match document.get_path(&path) {
        Some(value) => Some(field_value_to_json(value)?),
        None => {
            log::info!("{path} is not set in {}", args.file.display());
            None
        }
    };

    Ok(GetResult {
        path: path.canonical_string(),
        value,
    })
}

/// List every leaf path of a document.
pub fn flatten_document(args: &FlattenArgs) -> Result<FlattenResult> {
    let document = load_document(&args.file)?;

    let mut fields = BTreeMap::new();
    for (path, value) in document.flatten()? {
        fields.insert(path.canonical_string(), field_value_to_json(&value)?);
    }
    Ok(FlattenResult { fields })
}

/// Set a patch over a document.
pub fn merge_document(args: &MergeArgs) -> Result<WriteResult> {
    let mut document = load_document(&args.file)?;
    let patch = load_document(&args.patch)?;

    let options = if args.overwrite {
        SetOptions::Overwrite
    } else if args.fields.is_empty() {
        SetOptions::Merge
    } else {
        SetOptions::merge_fields(&args.fields)?
    };
    log::debug!("applying {} with {options:?}", args.patch.display());

    let fields_written = match &options {
        SetOptions::MergeFields(paths) => paths.len(),
        _ => patch.flatten()?.len(),
    };
    apply_set(&mut document, &patch, &options, Utc::now())?;

    Ok(WriteResult {
        fields_written,
        document: map_to_json(&document)?,
    })
}

/// Apply an object of dotted-path updates to a document.
pub fn update_document(args: &UpdateArgs) -> Result<WriteResult> {
    let mut document = load_document(&args.file)?;
    let raw = load_document(&args.updates)?;
    let updates = MapFieldPathValue::try_from_dotted(raw)?;

    apply_update(&mut document, &updates, Utc::now())?;

    Ok(WriteResult {
        fields_written: updates.len(),
        document: map_to_json(&document)?,
    })
}

fn load_document(path: &Path) -> Result<MapFieldValue> {
    log::debug!("reading {}", path.display());
    let text = fs::read_to_string(path)?;
    map_from_json_str(&text)
}
