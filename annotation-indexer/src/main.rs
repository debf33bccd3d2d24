//! Annotation Indexer Main Entry Point
//!
//! Reindexes the annotations of the PostgreSQL datastore into OpenSearch,
//! either all of them or the ids listed in `REINDEX_ANNOTATION_IDS`.

use annotation_indexer::{Dependencies, IndexContext, IndexerConfig, IndexingError};
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("annotation_indexer=info,annotation_indexer_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "annotation-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "annotation-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting annotation reindex");

    let config = IndexerConfig::from_env()?;

    let deps = match Dependencies::new(&config, IndexContext::new()).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let failed = match deps
        .batch_indexer
        .run(config.annotation_ids.as_deref())
        .await
    {
        Ok(failed) => failed,
        Err(e) => {
            error!(error = %e, "Annotation reindex failed");
            return Err(e.into());
        }
    };

    if failed.is_empty() {
        info!("Annotation reindex completed successfully");
        return Ok(());
    }

    let mut failed: Vec<String> = failed.into_iter().collect();
    failed.sort();
    error!(failed = ?failed, "Some annotations failed to index");
    Err(IndexingError::Incomplete { failed })
}
