//! Dependency initialization and wiring for the annotation indexer.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::{ConnectionMode, IndexerConfig};
use crate::batch::BatchIndexer;
use crate::events::IndexContext;
use crate::IndexingError;
use annotation_indexer_repository::opensearch::IndexConfig;
use annotation_indexer_repository::{
    AnnotationStore, OpenSearchProvider, PostgresAnnotationStore, SearchIndexProvider,
};
use annotation_indexer_shared::DocTypes;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured batch indexer ready to run.
    pub batch_indexer: BatchIndexer,
}

impl Dependencies {
    /// Initialize all dependencies from a parsed configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Settings read by `IndexerConfig::from_env`
    /// * `context` - Context carrying the transform hook subscribers
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails (OpenSearch only in fail-fast mode)
    pub async fn new(config: &IndexerConfig, context: IndexContext) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index_alias = %config.index_alias,
            index_version = config.index_version,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            op_type = %config.op_type,
            chunk_size = config.chunk_size,
            "Initializing dependencies"
        );

        let index_config = IndexConfig::new(config.index_alias.clone(), config.index_version);
        let doc_types = DocTypes::new(config.annotation_doc_type.clone());

        // Initialize OpenSearch provider with retry logic
        let search_provider = Self::connect_to_opensearch(
            &config.opensearch_url,
            index_config,
            doc_types,
            config.connection_mode,
            config.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        // Exits if index and alias cannot be created
        search_provider
            .ensure_index_exists()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to ensure index exists: {}", e)))?;

        let store = PostgresAnnotationStore::connect(&config.database_url).await?;

        info!("PostgreSQL connection established");

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(search_provider);
        let store: Arc<dyn AnnotationStore> = Arc::new(store);

        let batch_indexer = BatchIndexer::new(store, provider, Arc::new(context))
            .with_op_type(config.op_type)
            .with_chunk_size(config.chunk_size);

        Ok(Self { batch_indexer })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        doc_types: DocTypes,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match OpenSearchProvider::new(url, index_config.clone(), doc_types.clone()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
