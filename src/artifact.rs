//! JSON artifact boundaries between stages.
//!
//! Every stage reads and writes pretty-printed UTF-8 JSON. Writes serialize
//! the whole document in memory before the file is created, so a failing
//! stage never leaves a partial artifact behind. Required inputs that are
//! missing or malformed are fatal; the optional pagination input has its own
//! explicitly optional reader.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write a stage artifact as pretty-printed JSON.
///
/// Serialization happens fully in memory first; nothing is written when it
/// fails. Non-ASCII characters are preserved unescaped.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a required stage artifact.
///
/// A missing or malformed file is a fatal error: the calling stage cannot
/// proceed without it.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read an optional stage artifact.
///
/// Returns `Ok(None)` when the file does not exist — absence is a
/// first-class state for soft dependencies, decided here rather than deep
/// inside a stage. A file that exists but fails to parse is still an error.
pub fn read_json_opt<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    if !path.as_ref().exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}
