//! Versioned JSON snapshot of the catalog.

use super::CatalogFormat;
use crate::error::FormatError;
use crate::models::Publisher;
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    publishers: &'a [Publisher],
}

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

#[derive(Deserialize)]
struct SnapshotIn {
    #[serde(default)]
    publishers: Vec<Publisher>,
}

/// The JSON snapshot format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl CatalogFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn encode(&self, publishers: &[Publisher]) -> Result<String, FormatError> {
        let snapshot = SnapshotOut {
            version: SNAPSHOT_VERSION,
            publishers,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn decode(&self, input: &str) -> Result<Vec<Publisher>, FormatError> {
        // Check the version before the body so newer layouts fail clearly.
        let value: serde_json::Value = serde_json::from_str(input)?;
        let header = SnapshotHeader::deserialize(&value)?;
        if header.version != SNAPSHOT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let snapshot = SnapshotIn::deserialize(value)?;
        Ok(snapshot.publishers)
    }
}
