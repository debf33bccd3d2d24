//! Transform hook dispatch.
//!
//! Other subsystems enrich a search document just before it is persisted by
//! subscribing a callback on the `IndexContext`. Every time a document is
//! built the context fires an `AnnotationTransformEvent` carrying the
//! annotation and a mutable reference to the document.
//!
//! Subscribers run synchronously, in registration order. The first one to
//! return an error stops the dispatch and the error propagates to the caller.

use annotation_indexer_shared::{Annotation, Document};
use tracing::trace;
use uuid::Uuid;

use crate::errors::TransformError;

/// A transform hook subscriber.
pub type TransformHook =
    Box<dyn Fn(&mut AnnotationTransformEvent<'_>) -> Result<(), TransformError> + Send + Sync>;

/// Event fired for every document built, before it is written.
///
/// Subscribers may add, alter or remove fields of `document` in place. They
/// cannot swap in a different document.
pub struct AnnotationTransformEvent<'a> {
    pub context: &'a IndexContext,
    pub annotation: &'a Annotation,
    pub document: &'a mut Document,
}

impl<'a> AnnotationTransformEvent<'a> {
    pub fn new(
        context: &'a IndexContext,
        annotation: &'a Annotation,
        document: &'a mut Document,
    ) -> Self {
        Self {
            context,
            annotation,
            document,
        }
    }
}

/// Context that indexing operations run in.
///
/// Owns the ordered list of transform hook subscribers and an id used to
/// correlate the log lines of one indexing run.
pub struct IndexContext {
    request_id: Uuid,
    subscribers: Vec<TransformHook>,
}

impl Default for IndexContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IndexContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexContext")
            .field("request_id", &self.request_id)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl IndexContext {
    /// Create a context with no subscribers.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            subscribers: Vec::new(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Register a subscriber. Subscribers run in the order they were added.
    ///
    /// # Example
    ///
    /// ```
    /// use annotation_indexer::events::IndexContext;
    /// use serde_json::Value;
    ///
    /// let mut context = IndexContext::new();
    /// context.subscribe(|event| {
    ///     event
    ///         .document
    ///         .insert("transformed".to_string(), Value::Bool(true));
    ///     Ok(())
    /// });
    /// assert_eq!(context.subscriber_count(), 1);
    /// ```
    pub fn subscribe<F>(&mut self, hook: F)
    where
        F: Fn(&mut AnnotationTransformEvent<'_>) -> Result<(), TransformError>
            + Send
            + Sync
            + 'static,
    {
        self.subscribers.push(Box::new(hook));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Fire `event` at every subscriber, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error; later subscribers do not run.
    pub fn notify(&self, event: &mut AnnotationTransformEvent<'_>) -> Result<(), TransformError> {
        trace!(
            request_id = %self.request_id,
            annotation_id = %event.annotation.id,
            subscribers = self.subscriber_count(),
            "Firing annotation transform event"
        );
        for subscriber in &self.subscribers {
            subscriber(&mut *event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn annotation() -> Annotation {
        Annotation::new("a1", "acct:alice@example.com", "http://example.com")
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut context = IndexContext::new();

        for name in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            context.subscribe(move |_event| {
                calls.lock().unwrap().push(name);
                Ok(())
            });
        }

        let annotation = annotation();
        let mut document = Document::new();
        let mut event = AnnotationTransformEvent::new(&context, &annotation, &mut document);
        context.notify(&mut event).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_subscribers_mutate_document_in_place() {
        let mut context = IndexContext::new();
        context.subscribe(|event| {
            event.document.insert("transformed".to_string(), Value::Bool(true));
            Ok(())
        });
        context.subscribe(|event| {
            event.document.remove("text");
            Ok(())
        });

        let annotation = annotation();
        let mut document = json!({"id": "a1", "text": "hello"})
            .as_object()
            .cloned()
            .unwrap();
        let mut event = AnnotationTransformEvent::new(&context, &annotation, &mut document);
        context.notify(&mut event).unwrap();

        assert_eq!(Value::Object(document), json!({"id": "a1", "transformed": true}));
    }

    #[test]
    fn test_subscriber_error_stops_dispatch() {
        let reached = Arc::new(Mutex::new(false));
        let mut context = IndexContext::new();
        context.subscribe(|_event| Err(TransformError::new("boom")));
        {
            let reached = Arc::clone(&reached);
            context.subscribe(move |_event| {
                *reached.lock().unwrap() = true;
                Ok(())
            });
        }

        let annotation = annotation();
        let mut document = Document::new();
        let mut event = AnnotationTransformEvent::new(&context, &annotation, &mut document);
        let err = context.notify(&mut event).unwrap_err();

        assert_eq!(err.message(), "boom");
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn test_event_exposes_context() {
        let mut context = IndexContext::new();
        let expected = context.request_id();
        context.subscribe(move |event| {
            assert_eq!(event.context.request_id(), expected);
            Ok(())
        });

        let annotation = annotation();
        let mut document = Document::new();
        let mut event = AnnotationTransformEvent::new(&context, &annotation, &mut document);
        context.notify(&mut event).unwrap();
    }

    #[test]
    fn test_debug_reports_subscriber_count() {
        let mut context = IndexContext::new();
        assert_eq!(context.subscriber_count(), 0);
        context.subscribe(|_event| Ok(()));
        context.subscribe(|_event| Ok(()));

        assert_eq!(context.subscriber_count(), 2);
        assert!(format!("{:?}", context).contains("subscribers: 2"));
    }
}
