use std::fs;
use std::path::{Path, PathBuf};

use gap_core::errors::{io_error, ErrorInfo, GapError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn json_error(code: &str, err: serde_json::Error) -> GapError {
    GapError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Rebuilds every object with its keys in lexical order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = object.into_iter().collect();
            entries.sort_by(|left, right| left.0.cmp(&right.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        scalar => scalar,
    }
}

/// Pretty printed JSON with sorted object keys and a trailing newline.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, GapError> {
    let tree = serde_json::to_value(value).map_err(|err| json_error("gap_dispatch.json_encode", err))?;
    let mut bytes = serde_json::to_vec_pretty(&sort_keys(tree))
        .map_err(|err| json_error("gap_dispatch.json_encode", err))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parses a JSON document produced by [`to_canonical_json_bytes`] or by hand.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, GapError> {
    serde_json::from_slice(bytes).map_err(|err| json_error("gap_dispatch.json_decode", err))
}

/// Lowercase hex SHA-256 of the canonical JSON form.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, GapError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(format!("{digest:x}"))
}

/// Writes `value` as canonical JSON to `path` through a sibling `.tmp` file
/// and a rename.
pub fn write_canonical_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GapError> {
    let bytes = to_canonical_json_bytes(value)?;
    let mut staging_name = path.file_name().unwrap_or_default().to_os_string();
    staging_name.push(".tmp");
    let staging: PathBuf = path.with_file_name(staging_name);
    fs::write(&staging, bytes).map_err(|err| io_error("gap_dispatch.json_write", &staging, err))?;
    fs::rename(&staging, path).map_err(|err| io_error("gap_dispatch.json_rename", path, err))
}
