// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON decoding of flat record lists (`[{"id": 1, "parent": "root"}, ...]`).

use std::io::Read;

use crate::index::TreeIndex;
use crate::record::Record;

/// Errors raised while decoding or encoding a record list.
///
/// Index construction itself never fails; these only cover the JSON layer.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Input was not a JSON array of well-formed records.
    #[error("[TREE_JSON] {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the input failed.
    #[error("[TREE_IO] {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a record list from JSON bytes.
pub fn records_from_json_slice(bytes: &[u8]) -> Result<Vec<Record>, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode a record list from a reader (read fully before parsing).
pub fn records_from_reader<R: Read>(mut reader: R) -> Result<Vec<Record>, LoadError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    records_from_json_slice(&buf)
}

/// Encode a record list as pretty JSON, field order preserved.
pub fn records_to_json_vec(records: &[Record]) -> Result<Vec<u8>, LoadError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

impl TreeIndex {
    /// Decode a JSON record list and index it.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        records_from_json_slice(bytes).map(Self::new)
    }
}
