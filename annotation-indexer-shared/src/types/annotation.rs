//! Annotation types as read from the primary datastore.
//!
//! The indexer treats these as read-only input. They are produced by an
//! `AnnotationStore` and consumed by a presenter when building search
//! documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored annotation, mirrored into the search index.
///
/// The `id` is the join key between the datastore and the search index. It is
/// opaque to the indexer and is never regenerated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub id: String,
    /// Account identifier in the form `acct:username@authority`.
    pub userid: String,
    pub groupid: String,
    pub shared: bool,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ids of the annotations this one replies to, root first.
    #[serde(default)]
    pub references: Vec<String>,
    pub target_uri: String,
    /// Normalized form of `target_uri`, used for scope enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_uri_normalized: Option<String>,
    /// Selectors anchoring the annotation inside the target document.
    #[serde(default)]
    pub target_selectors: Vec<Value>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentMetadata>,
}

/// Metadata about the web document an annotation is anchored to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_uri: Option<String>,
}

impl Annotation {
    /// Create a non-deleted, shared annotation in the `__world__` group with
    /// no text, tags, selectors or document metadata.
    ///
    /// # Example
    ///
    /// ```
    /// use annotation_indexer_shared::Annotation;
    ///
    /// let annotation = Annotation::new("a1", "acct:alice@example.com", "http://example.com/page");
    /// assert_eq!(annotation.authority(), Some("example.com"));
    /// assert!(!annotation.deleted);
    /// ```
    pub fn new(
        id: impl Into<String>,
        userid: impl Into<String>,
        target_uri: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            userid: userid.into(),
            groupid: "__world__".to_string(),
            shared: true,
            deleted: false,
            text: None,
            tags: Vec::new(),
            references: Vec::new(),
            target_uri: target_uri.into(),
            target_uri_normalized: None,
            target_selectors: Vec::new(),
            created: now,
            updated: now,
            document: None,
        }
    }

    /// The authority part of the `userid`, e.g. `example.com` for
    /// `acct:someone@example.com`.
    pub fn authority(&self) -> Option<&str> {
        self.userid
            .strip_prefix("acct:")
            .and_then(|account| account.rsplit_once('@'))
            .map(|(_, authority)| authority)
            .filter(|authority| !authority.is_empty())
    }

    /// The id of the top-level annotation of the thread this one belongs to.
    pub fn thread_root_id(&self) -> &str {
        self.references.first().map(String::as_str).unwrap_or(&self.id)
    }
}
