//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the annotation index.

use serde_json::{json, Value};

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The alias name for the search index (used for all operations).
    pub alias: String,
    /// The version number for the index (e.g., 0 for "annotations_v0").
    pub version: u32,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name
    /// * `version` - The version number
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
        }
    }

    /// The concrete index the alias points at, e.g. `annotations_v0`.
    pub fn versioned_index_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

/// Get the index settings, mappings and alias for the annotation index.
///
/// The `document` field is stored but not indexed; consumers read it from
/// `_source` after retrieving an annotation by other fields.
pub fn get_index_settings(alias: &str) -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "aliases": {
            alias: {}
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "created": { "type": "date" },
                "updated": { "type": "date" },
                "user": { "type": "keyword" },
                "user_raw": { "type": "keyword" },
                "authority": { "type": "keyword" },
                "uri": { "type": "keyword" },
                "text": { "type": "text" },
                "tags": { "type": "text" },
                "tags_raw": { "type": "keyword" },
                "group": { "type": "keyword" },
                "shared": { "type": "boolean" },
                "deleted": { "type": "boolean" },
                "references": { "type": "keyword" },
                "thread_ids": { "type": "keyword" },
                "target": {
                    "properties": {
                        "source": { "type": "keyword" },
                        "scope": { "type": "keyword" },
                        "selector": { "type": "object", "enabled": false }
                    }
                },
                "document": { "type": "object", "enabled": false }
            }
        }
    })
}
