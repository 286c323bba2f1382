//! logfeed — load newline-delimited JSON access logs into Elasticsearch.
//!
//! Fetches the body at `url`, ensures `index_name` exists with the access log
//! mapping, then indexes each line as a new document. Records with bad
//! `time`/`response`/`bytes` values or refused by the store are logged and
//! skipped; anything else aborts the run.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use logfeed_core::config::load_dotenv;
use logfeed_core::IngestConfig;
use logfeed_ingest::{ElasticsearchStore, HttpSource};

// ── CLI ─────────────────────────────────────────────────────────────

/// Index data from a JSON lines file to Elasticsearch.
#[derive(Parser, Debug)]
#[command(name = "logfeed", version, about)]
struct Cli {
    /// The URL of the file to read.
    url: String,

    /// The name of the Elasticsearch index to use.
    index_name: String,

    /// The URL of the Elasticsearch API endpoint.
    elasticsearch_api: String,

    /// The username to use for Elasticsearch authentication.
    username: String,

    /// The password to use for Elasticsearch authentication.
    password: String,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = IngestConfig::new(
        &cli.url,
        &cli.index_name,
        &cli.elasticsearch_api,
        &cli.username,
        &cli.password,
    )
    .context("invalid arguments")?;
    config.log_summary();

    let store = ElasticsearchStore::new(&config.store);
    let source = HttpSource::new();

    let summary = logfeed_ingest::run(&config, &source, store)
        .await
        .with_context(|| format!("ingestion into index '{}' failed", config.index))?;

    info!(
        indexed = summary.indexed,
        dropped = summary.dropped(),
        "logfeed exited cleanly"
    );
    Ok(())
}
