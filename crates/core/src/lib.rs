pub mod config;
pub mod error;
pub mod record;
pub mod schema;

pub use config::{IngestConfig, StoreConfig};
pub use error::*;
pub use record::*;
pub use schema::*;
