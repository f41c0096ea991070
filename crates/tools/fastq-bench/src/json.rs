//! JSON persistence for parsed transcripts and summaries.
//!
//! Durations are written as fractional seconds (see [`crate::elapsed::seconds`]).
//! Map keys come out sorted because the model uses `BTreeMap`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::model::Transcript;

/// Fail unless `path` ends in `.{ext}`.
pub fn ensure_extension(path: &Path, ext: &str) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some(ext) {
        bail!("file extension is not '.{ext}': {}", path.display());
    }
    Ok(())
}

/// Serialize any value as pretty-printed JSON.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing to JSON")
}

/// Write `value` as pretty JSON to a `.json` file.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    ensure_extension(path, "json")?;
    let mut json = to_json_string(value)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Parse a transcript previously written by [`write_json`].
pub fn from_json_str(json: &str) -> Result<Transcript> {
    serde_json::from_str(json).context("parsing transcript JSON")
}

/// Read a transcript previously written by [`write_json`].
pub fn read_json(path: &Path) -> Result<Transcript> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    from_json_str(&json).with_context(|| format!("in {}", path.display()))
}
