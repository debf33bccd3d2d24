//! Configuration for the annotation indexer binary.
//!
//! Settings come from environment variables. `IndexerConfig::from_lookup`
//! takes any key lookup so parsing can be tested without touching the
//! process environment.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::time::Duration;

use annotation_indexer_repository::config::DEFAULT_CHUNK_SIZE;
use annotation_indexer_shared::{OpType, TYPELESS_DOC_TYPE};
use tracing::warn;

use crate::IndexingError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index alias.
const DEFAULT_INDEX_ALIAS: &str = "annotations";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Parsed settings of one reindex run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerConfig {
    pub database_url: String,
    pub opensearch_url: String,
    pub index_alias: String,
    pub index_version: u32,
    /// Backend type name for annotation documents.
    pub annotation_doc_type: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub op_type: OpType,
    pub chunk_size: usize,
    /// Ids to restrict the reindex to; every annotation when `None`.
    pub annotation_ids: Option<Vec<String>>,
}

impl IndexerConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_ALIAS`: Index alias name (default: "annotations")
    /// - `ANNOTATIONS_INDEX_VERSION`: Index version number (default: 0)
    /// - `ANNOTATION_DOC_TYPE`: Backend type of annotation documents (default: "_doc")
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `REINDEX_OP_TYPE`: "index" or "create" (default: index)
    /// - `REINDEX_CHUNK_SIZE`: Actions per bulk request (default: 100)
    /// - `REINDEX_ANNOTATION_IDS`: Comma-separated ids to reindex (default: all)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from a key lookup.
    ///
    /// Unparseable numbers fall back to their defaults; an unknown op type
    /// or a missing `DATABASE_URL` is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| IndexingError::config("DATABASE_URL must be set"))?;

        let op_type = match lookup("REINDEX_OP_TYPE") {
            Some(value) => value
                .parse::<OpType>()
                .map_err(|e| IndexingError::config(e.to_string()))?,
            None => OpType::default(),
        };

        let annotation_ids = lookup("REINDEX_ANNOTATION_IDS").and_then(|value| {
            let ids: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
            (!ids.is_empty()).then_some(ids)
        });

        Ok(Self {
            database_url,
            opensearch_url: lookup("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            index_alias: lookup("INDEX_ALIAS").unwrap_or_else(|| DEFAULT_INDEX_ALIAS.to_string()),
            index_version: lookup("ANNOTATIONS_INDEX_VERSION")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(0),
            annotation_doc_type: lookup("ANNOTATION_DOC_TYPE")
                .unwrap_or_else(|| TYPELESS_DOC_TYPE.to_string()),
            connection_mode: ConnectionMode::parse(
                lookup("OPENSEARCH_CONNECTION_MODE").as_deref(),
            ),
            retry_interval: Duration::from_secs(
                lookup("OPENSEARCH_RETRY_INTERVAL_SECS")
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS),
            ),
            op_type,
            chunk_size: lookup("REINDEX_CHUNK_SIZE")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            annotation_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<IndexerConfig, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/h")]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/h");
        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.index_alias, "annotations");
        assert_eq!(config.index_version, 0);
        assert_eq!(config.annotation_doc_type, "_doc");
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
        assert_eq!(config.retry_interval, Duration::from_secs(15));
        assert_eq!(config.op_type, OpType::Index);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.annotation_ids, None);
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(matches!(config(&[]), Err(IndexingError::ConfigError(_))));
        assert!(matches!(
            config(&[("DATABASE_URL", "  ")]),
            Err(IndexingError::ConfigError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/h"),
            ("OPENSEARCH_URL", "http://search:9200"),
            ("INDEX_ALIAS", "hypothesis"),
            ("ANNOTATIONS_INDEX_VERSION", "3"),
            ("ANNOTATION_DOC_TYPE", "annotation"),
            ("OPENSEARCH_CONNECTION_MODE", "Fail-Fast"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "2"),
            ("REINDEX_OP_TYPE", "create"),
            ("REINDEX_CHUNK_SIZE", "250"),
        ])
        .unwrap();

        assert_eq!(config.opensearch_url, "http://search:9200");
        assert_eq!(config.index_alias, "hypothesis");
        assert_eq!(config.index_version, 3);
        assert_eq!(config.annotation_doc_type, "annotation");
        assert_eq!(config.connection_mode, ConnectionMode::FailFast);
        assert_eq!(config.retry_interval, Duration::from_secs(2));
        assert_eq!(config.op_type, OpType::Create);
        assert_eq!(config.chunk_size, 250);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/h"),
            ("ANNOTATIONS_INDEX_VERSION", "latest"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "-1"),
            ("REINDEX_CHUNK_SIZE", "0"),
            ("OPENSEARCH_CONNECTION_MODE", "sometimes"),
        ])
        .unwrap();

        assert_eq!(config.index_version, 0);
        assert_eq!(config.retry_interval, Duration::from_secs(15));
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
    }

    #[test]
    fn test_unknown_op_type_is_an_error() {
        let result = config(&[
            ("DATABASE_URL", "postgres://localhost/h"),
            ("REINDEX_OP_TYPE", "upsert"),
        ]);

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_annotation_id_filter() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/h"),
            ("REINDEX_ANNOTATION_IDS", " a1, a2,,a3 "),
        ])
        .unwrap();

        assert_eq!(
            config.annotation_ids,
            Some(vec!["a1".to_string(), "a2".to_string(), "a3".to_string()])
        );
    }

    #[test]
    fn test_blank_annotation_id_filter_selects_all() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/h"),
            ("REINDEX_ANNOTATION_IDS", " , "),
        ])
        .unwrap();

        assert_eq!(config.annotation_ids, None);
    }
}
