pub mod pipeline;
pub mod source;
pub mod store;

pub use pipeline::{run, DropReason, IngestSummary, Ingestor, LineOutcome};
pub use source::{FetchError, HttpSource, LogSource};
pub use store::{CreateOutcome, DocumentStore, ElasticsearchStore, IndexOutcome, StoreError};
