//! PostgreSQL annotation store.
//!
//! Streams annotations with `sqlx`'s row-by-row `fetch`, so a full reindex
//! never buffers the result set.
//!
//! ## Database Tables
//!
//! - `annotation`: one row per annotation, with a `deleted` flag and an
//!   optional `document_id`
//! - `document`: metadata of the annotated web documents (`title`, `web_uri`)

use annotation_indexer_shared::{Annotation, DocumentMetadata};
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::errors::AnnotationStoreError;
use crate::interfaces::AnnotationStore;

macro_rules! select_annotations {
    () => {
        r#"
    SELECT
        a.id,
        a.userid,
        a.groupid,
        a.shared,
        a.deleted,
        a.text,
        a.tags,
        a."references",
        a.target_uri,
        a.target_uri_normalized,
        a.target_selectors,
        a.created,
        a.updated,
        d.id IS NOT NULL AS has_document,
        d.title AS document_title,
        d.web_uri AS document_web_uri
    FROM annotation a
    LEFT JOIN document d ON d.id = a.document_id
    WHERE a.deleted = false
"#
    };
}

const SELECT_ANNOTATIONS: &str = select_annotations!();

const SELECT_ANNOTATIONS_BY_IDS: &str = concat!(select_annotations!(), " AND a.id = ANY($1)");

/// One row of the annotation query.
#[derive(Debug, FromRow)]
struct AnnotationRow {
    id: String,
    userid: String,
    groupid: String,
    shared: bool,
    deleted: bool,
    text: Option<String>,
    tags: Option<Vec<String>>,
    references: Option<Vec<String>>,
    target_uri: String,
    target_uri_normalized: Option<String>,
    target_selectors: Option<Json<Vec<Value>>>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    has_document: bool,
    document_title: Option<String>,
    document_web_uri: Option<String>,
}

impl From<AnnotationRow> for Annotation {
    fn from(row: AnnotationRow) -> Self {
        let document = row.has_document.then(|| DocumentMetadata {
            title: row.document_title,
            web_uri: row.document_web_uri,
        });

        Annotation {
            id: row.id,
            userid: row.userid,
            groupid: row.groupid,
            shared: row.shared,
            deleted: row.deleted,
            text: row.text,
            tags: row.tags.unwrap_or_default(),
            references: row.references.unwrap_or_default(),
            target_uri: row.target_uri,
            target_uri_normalized: row.target_uri_normalized,
            target_selectors: row.target_selectors.map(|j| j.0).unwrap_or_default(),
            created: row.created,
            updated: row.updated,
            document,
        }
    }
}

/// PostgreSQL implementation of `AnnotationStore`.
pub struct PostgresAnnotationStore {
    pool: sqlx::PgPool,
}

impl PostgresAnnotationStore {
    /// Creates a store on top of an existing pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `url`.
    pub async fn connect(url: &str) -> Result<Self, AnnotationStoreError> {
        let pool = sqlx::PgPool::connect(url).await?;
        Ok(Self { pool })
    }
}

impl AnnotationStore for PostgresAnnotationStore {
    fn annotations(&self) -> BoxStream<'_, Result<Annotation, AnnotationStoreError>> {
        sqlx::query_as::<_, AnnotationRow>(SELECT_ANNOTATIONS)
            .fetch(&self.pool)
            .map(|row| row.map(Annotation::from).map_err(AnnotationStoreError::from))
            .boxed()
    }

    fn annotations_by_ids<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxStream<'a, Result<Annotation, AnnotationStoreError>> {
        sqlx::query_as::<_, AnnotationRow>(SELECT_ANNOTATIONS_BY_IDS)
            .bind(ids)
            .fetch(&self.pool)
            .map(|row| row.map(Annotation::from).map_err(AnnotationStoreError::from))
            .boxed()
    }
}
