use std::sync::Arc;

use async_trait::async_trait;
use logfeed_core::{AccessLogDocument, IndexSchema};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Stored under the identifier the store assigned.
    Indexed { id: String },
    /// The store refused this document; other documents are unaffected.
    Rejected { reason: String },
}

/// Trait for document store backends (Elasticsearch, OpenSearch, ...).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the index with the given field mapping. An existing index is
    /// not an error.
    async fn create_index(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<CreateOutcome, StoreError>;

    /// Submit one document without an explicit id.
    async fn index_document(
        &self,
        index: &str,
        doc: &AccessLogDocument,
    ) -> Result<IndexOutcome, StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn create_index(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<CreateOutcome, StoreError> {
        (**self).create_index(index, schema).await
    }

    async fn index_document(
        &self,
        index: &str,
        doc: &AccessLogDocument,
    ) -> Result<IndexOutcome, StoreError> {
        (**self).index_document(index, doc).await
    }
}
