//! Integration tests for the CLI commands operating on JSON files.

use std::fs;
use std::path::PathBuf;

use docfield::cli::args::{FlattenArgs, GetArgs, MergeArgs, UpdateArgs};
use docfield::cli::commands::{flatten_document, get_field, merge_document, update_document};
use docfield::error::FieldError;
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, value.to_string()).unwrap();
    path
}

fn user_document(dir: &TempDir) -> PathBuf {
    write_json(
        dir,
        "user.json",
        json!({
            "name": "Ada",
            "visits": 3,
            "address": {"city": "London", "zip": "N1"},
            "tags": ["math"]
        }),
    )
}

#[test]
fn test_get_field() {
    let dir = TempDir::new().unwrap();
    let file = user_document(&dir);

    let result = get_field(&GetArgs {
        file: file.clone(),
        path: "address.city".to_string(),
    })
    .unwrap();
    assert_eq!(result.path, "address.city");
    assert_eq!(result.value, Some(json!("London")));

    let missing = get_field(&GetArgs {
        file: file.clone(),
        path: "address.country".to_string(),
    })
    .unwrap();
    assert_eq!(missing.value, None);

    let invalid = get_field(&GetArgs {
        file,
        path: "address..city".to_string(),
    });
    assert!(matches!(invalid, Err(FieldError::InvalidPath(_))));
}

#[test]
fn test_flatten_document() {
    let dir = TempDir::new().unwrap();
    let file = write_json(
        &dir,
        "doc.json",
        json!({"a": {"b": 1, "c.d": true}, "e": [], "f": {}}),
    );

    let result = flatten_document(&FlattenArgs { file }).unwrap();
    let keys: Vec<&str> = result.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a.`c.d`", "a.b", "e", "f"]);
    assert_eq!(result.fields["a.b"], json!(1));
    assert_eq!(result.fields["f"], json!({}));
}

#[test]
fn test_empty_field_name_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = user_document(&dir);
    let bad = write_json(&dir, "bad.json", json!({"a": {"": 1, "b": 2}}));

    let flattened = flatten_document(&FlattenArgs { file: bad.clone() });
    assert!(matches!(flattened, Err(FieldError::InvalidPath(_))));

    for overwrite in [false, true] {
        let merged = merge_document(&MergeArgs {
            file: file.clone(),
            patch: bad.clone(),
            fields: vec![],
            overwrite,
        });
        assert!(matches!(merged, Err(FieldError::InvalidPath(_))));
    }
}

#[test]
fn test_merge_document() {
    let dir = TempDir::new().unwrap();
    let file = user_document(&dir);
    let patch = write_json(&dir, "patch.json", json!({"address": {"city": "Paris"}, "age": 36}));

    let merged = merge_document(&MergeArgs {
        file: file.clone(),
        patch: patch.clone(),
        fields: vec![],
        overwrite: false,
    })
    .unwrap();
    assert_eq!(merged.fields_written, 2);
    assert_eq!(merged.document["address"], json!({"city": "Paris", "zip": "N1"}));
    assert_eq!(merged.document["age"], json!(36));
    assert_eq!(merged.document["name"], json!("Ada"));

    let selected = merge_document(&MergeArgs {
        file: file.clone(),
        patch: patch.clone(),
        fields: vec!["age".to_string()],
        overwrite: false,
    })
    .unwrap();
    assert_eq!(selected.fields_written, 1);
    assert_eq!(selected.document["address"]["city"], json!("London"));
    assert_eq!(selected.document["age"], json!(36));

    let replaced = merge_document(&MergeArgs {
        file,
        patch,
        fields: vec![],
        overwrite: true,
    })
    .unwrap();
    assert_eq!(replaced.document, json!({"address": {"city": "Paris"}, "age": 36}));
}

#[test]
fn test_update_document() {
    let dir = TempDir::new().unwrap();
    let file = user_document(&dir);
    let updates = write_json(
        &dir,
        "updates.json",
        json!({"address.zip": "75001", "profile.lang": "en"}),
    );

    let updated = update_document(&UpdateArgs {
        file: file.clone(),
        updates,
    })
    .unwrap();
    assert_eq!(updated.fields_written, 2);
    assert_eq!(updated.document["address"], json!({"city": "London", "zip": "75001"}));
    assert_eq!(updated.document["profile"], json!({"lang": "en"}));

    let conflicting = write_json(&dir, "conflict.json", json!({"address": 1, "address.zip": 2}));
    let result = update_document(&UpdateArgs {
        file,
        updates: conflicting,
    });
    assert!(matches!(result, Err(FieldError::InvalidPath(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = flatten_document(&FlattenArgs {
        file: dir.path().join("nope.json"),
    });
    assert!(matches!(result, Err(FieldError::Io(_))));
}
