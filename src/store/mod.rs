//! The narrow read/write seam to the remote document store.
//!
//! The concrete protocol (and its consistency machinery) lives behind the
//! `DocumentStore` trait. The crate assumes strongly consistent
//! single-document reads and writes and eventually-delivered change
//! notifications, nothing more.

mod memory;

pub use memory::MemoryStore;

use crate::Result;
use tokio::sync::mpsc;

/// A raw persisted document: a JSON object in its native key order.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A deferred full-document write produced by a validation operation. The
/// caller decides when (and whether) to send it to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub path: String,
    pub document: Document,
}

/// Abstract remote document store.
///
/// Write operations have full-document overwrite semantics with
/// last-writer-wins resolution; there is no version check.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a single document, `None` if it does not exist.
    async fn read_document(&self, path: &str) -> Result<Option<Document>>;

    /// Writes (or overwrites) a single document.
    async fn write_document(&self, path: &str, document: Document) -> Result<()>;

    /// Deletes a single document. Deleting a missing document is not an error.
    async fn delete_document(&self, path: &str) -> Result<()>;

    /// Returns up to `limit` documents of a collection, ordered ascending by
    /// the `order_by` field.
    async fn query_collection(
        &self,
        path: &str,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Returns the documents of a collection whose `id` field is in `ids`.
    ///
    /// Stores commonly cap the size of an in-set filter; callers must chunk
    /// (see [`crate::resolve::ID_SET_QUERY_MAX`]).
    async fn query_by_id_set(&self, path: &str, ids: &[String]) -> Result<Vec<Document>>;

    /// Subscribes to change notifications for a collection. Each notification
    /// carries the full collection contents. Dropping the receiver
    /// unsubscribes.
    async fn subscribe(&self, path: &str) -> Result<mpsc::Receiver<Vec<Document>>>;
}
