use serde::Serialize;
use url::Url;

use crate::error::LogfeedError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn parse_url(kind: &str, raw: &str) -> Result<Url, LogfeedError> {
    Url::parse(raw).map_err(|e| LogfeedError::Config(format!("invalid {kind} '{raw}': {e}")))
}

// ── Top-level config ──────────────────────────────────────────

/// Everything one ingestion run needs, resolved from the command line.
#[derive(Debug, Clone, Serialize)]
pub struct IngestConfig {
    pub source_url: String,
    pub index: String,
    pub store: StoreConfig,
}

impl IngestConfig {
    pub fn new(
        source_url: &str,
        index: &str,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, LogfeedError> {
        parse_url("source url", source_url)?;
        if index.is_empty() {
            return Err(LogfeedError::Config("index name must not be empty".into()));
        }
        Ok(Self {
            source_url: source_url.to_string(),
            index: index.to_string(),
            store: StoreConfig::new(endpoint, username, password)?,
        })
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  source:  url={}", self.source_url);
        tracing::info!("  store:   endpoint={}, index={}", self.store.endpoint, self.index);
        tracing::info!(
            "  auth:    {}",
            match self.store.credentials() {
                Some((user, _)) => format!("basic (user={user})"),
                None => "none".to_string(),
            }
        );
    }
}

// ── Document store ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StoreConfig {
    /// Base URL without trailing slash.
    pub endpoint: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl StoreConfig {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Result<Self, LogfeedError> {
        parse_url("store endpoint", endpoint)?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Basic-auth credentials, only when both parts are non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() || self.password.is_empty() {
            None
        } else {
            Some((self.username.as_str(), self.password.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_parts() {
        let both = StoreConfig::new("http://localhost:9200", "elastic", "secret").unwrap();
        assert_eq!(both.credentials(), Some(("elastic", "secret")));

        let no_pass = StoreConfig::new("http://localhost:9200", "elastic", "").unwrap();
        assert_eq!(no_pass.credentials(), None);

        let no_user = StoreConfig::new("http://localhost:9200", "", "secret").unwrap();
        assert_eq!(no_user.credentials(), None);
    }

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let cfg = StoreConfig::new("https://es.example.com:9243/", "", "").unwrap();
        assert_eq!(cfg.endpoint, "https://es.example.com:9243");
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(matches!(
            IngestConfig::new("not a url", "logs", "http://localhost:9200", "", ""),
            Err(LogfeedError::Config(_))
        ));
        assert!(matches!(
            IngestConfig::new("http://host/access.log", "logs", "localhost", "", ""),
            Err(LogfeedError::Config(_))
        ));
        assert!(matches!(
            IngestConfig::new("http://host/access.log", "", "http://localhost:9200", "", ""),
            Err(LogfeedError::Config(_))
        ));
    }

    #[test]
    fn password_is_not_serialized() {
        let cfg = IngestConfig::new(
            "http://host/access.log",
            "nginx",
            "http://localhost:9200",
            "elastic",
            "hunter2",
        )
        .unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("elastic"));
    }
}
