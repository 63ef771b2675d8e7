//! Loaders for the frozen wire contracts under the workspace `contracts/` directory.

use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;

/// Absolute path of a file below `contracts/`.
pub fn contract_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../contracts")
        .join(relative)
}

/// Raw bytes of a contract file.
pub fn load_raw(relative: &str) -> Result<Vec<u8>, String> {
    let path = contract_path(relative);
    std::fs::read(&path).map_err(|error| format!("{} unreadable: {error}", path.display()))
}

/// Parsed JSON of a contract file.
pub fn load_json(relative: &str) -> Result<Value, String> {
    serde_json::from_slice(&load_raw(relative)?)
        .map_err(|error| format!("{relative} is not valid json: {error}"))
}

/// Compiled validator for a schema file.
pub fn compile_validator(schema: &str) -> Result<JSONSchema, String> {
    let schema = load_json(schema)?;
    JSONSchema::compile(&schema).map_err(|error| format!("schema should compile: {error}"))
}
