pub mod elasticsearch;
pub mod traits;

pub use elasticsearch::ElasticsearchStore;
pub use traits::{CreateOutcome, DocumentStore, IndexOutcome, StoreError};
