//! Per-line ingestion: parse, coerce, submit.
//!
//! Errors come in two tiers. A [`LogfeedError`] aborts the run: schema
//! declaration failure, fetch failure, a line that is not a JSON object or
//! lacks one of `time`/`response`/`bytes`, or a store that cannot be
//! reached. Everything scoped to a single record (bad field values, a write
//! the store refuses) becomes a [`LineOutcome::Dropped`] and the loop moves
//! on.

use logfeed_core::{CoercionError, IndexSchema, IngestConfig, LogRecord, LogfeedError};
use tracing::{debug, info, warn};

use crate::source::{split_lines, LogSource};
use crate::store::{CreateOutcome, DocumentStore, IndexOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    Coercion(CoercionError),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Empty or whitespace-only line.
    Skipped,
    Indexed { id: String },
    Dropped(DropReason),
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines: usize,
    pub skipped: usize,
    pub indexed: usize,
    pub dropped_coercion: usize,
    pub dropped_rejected: usize,
}

impl IngestSummary {
    pub fn dropped(&self) -> usize {
        self.dropped_coercion + self.dropped_rejected
    }

    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Skipped => self.skipped += 1,
            LineOutcome::Indexed { .. } => self.indexed += 1,
            LineOutcome::Dropped(DropReason::Coercion(_)) => self.dropped_coercion += 1,
            LineOutcome::Dropped(DropReason::Rejected(_)) => self.dropped_rejected += 1,
        }
    }

    pub fn log(&self) {
        info!(
            lines = self.lines,
            indexed = self.indexed,
            skipped = self.skipped,
            dropped_coercion = self.dropped_coercion,
            dropped_rejected = self.dropped_rejected,
            "ingestion finished"
        );
    }
}

/// Owns the store handle for one target index.
///
/// The only constructor declares the index schema, so no document can be
/// submitted before the mapping exists.
pub struct Ingestor<S: DocumentStore> {
    store: S,
    index: String,
}

impl<S: DocumentStore> Ingestor<S> {
    pub async fn prepare(store: S, index: &str) -> Result<Self, LogfeedError> {
        let outcome = store
            .create_index(index, &IndexSchema::access_log())
            .await
            .map_err(|e| LogfeedError::Schema(e.to_string()))?;

        match outcome {
            CreateOutcome::Created => info!(index, "created index"),
            CreateOutcome::AlreadyExists => info!(index, "index already exists"),
        }

        Ok(Self {
            store,
            index: index.to_string(),
        })
    }

    /// Release the store handle.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Process one line. `line_no` is 1-based and only used for diagnostics.
    pub async fn ingest_line(
        &self,
        line_no: usize,
        line: &str,
    ) -> Result<LineOutcome, LogfeedError> {
        if line.trim().is_empty() {
            return Ok(LineOutcome::Skipped);
        }

        let malformed = |source| LogfeedError::MalformedLine {
            line: line_no,
            source,
        };
        let coerced = LogRecord::parse(line)
            .and_then(LogRecord::coerce)
            .map_err(malformed)?;

        let doc = match coerced {
            Ok(doc) => doc,
            Err(e) => {
                warn!(line = line_no, error = %e, "error parsing document");
                return Ok(LineOutcome::Dropped(DropReason::Coercion(e)));
            }
        };

        let outcome = self
            .store
            .index_document(&self.index, &doc)
            .await
            .map_err(|e| LogfeedError::Store(e.to_string()))?;

        match outcome {
            IndexOutcome::Indexed { id } => {
                debug!(line = line_no, id = %id, "indexed document");
                Ok(LineOutcome::Indexed { id })
            }
            IndexOutcome::Rejected { reason } => {
                warn!(line = line_no, error = %reason, "error indexing document");
                Ok(LineOutcome::Dropped(DropReason::Rejected(reason)))
            }
        }
    }

    /// Process every line of `body` in order, stopping at the first fatal error.
    pub async fn ingest_body(&self, body: &str) -> Result<IngestSummary, LogfeedError> {
        let mut summary = IngestSummary::default();

        for (i, line) in split_lines(body).enumerate() {
            match self.ingest_line(i + 1, line).await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    warn!(
                        line = i + 1,
                        indexed = summary.indexed,
                        "aborting run; documents indexed so far are kept"
                    );
                    return Err(e);
                }
            }
        }

        Ok(summary)
    }
}

/// Declare the schema, fetch the source, and ingest it.
///
/// Takes ownership of the store handle; it is dropped when the run ends,
/// whether it succeeded or not.
pub async fn run<S, L>(
    config: &IngestConfig,
    source: &L,
    store: S,
) -> Result<IngestSummary, LogfeedError>
where
    S: DocumentStore,
    L: LogSource,
{
    let ingestor = Ingestor::prepare(store, &config.index).await?;

    let body = source
        .fetch(&config.source_url)
        .await
        .map_err(|e| LogfeedError::Fetch(e.to_string()))?;
    info!(url = %config.source_url, bytes = body.len(), "fetched source");

    let summary = ingestor.ingest_body(&body).await?;
    summary.log();
    Ok(summary)
}
