//! Bulk write modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Write mode for bulk indexing.
///
/// `Index` is a full-document upsert. `Create` only writes documents that do
/// not exist yet and reports a conflict for the ones that do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    #[default]
    Index,
    Create,
}

impl OpType {
    /// The bulk API verb for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpType::Index => "index",
            OpType::Create => "create",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown op type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown op type '{0}', expected 'index' or 'create'")]
pub struct ParseOpTypeError(pub String);

impl FromStr for OpType {
    type Err = ParseOpTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "index" => Ok(OpType::Index),
            "create" => Ok(OpType::Create),
            other => Err(ParseOpTypeError(other.to_string())),
        }
    }
}
