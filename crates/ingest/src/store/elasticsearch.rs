use super::traits::{CreateOutcome, DocumentStore, IndexOutcome, StoreError};
use async_trait::async_trait;
use logfeed_core::{AccessLogDocument, IndexSchema, StoreConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Document store backed by the Elasticsearch REST API.
///
/// Building the client does not touch the network; connection problems
/// surface on the first request.
pub struct ElasticsearchStore {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl ElasticsearchStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            credentials: config
                .credentials()
                .map(|(u, p)| (u.to_string(), p.to_string())),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }
}

#[derive(Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

/// The `error` member of an Elasticsearch error body: an object with
/// `type`/`reason`, or a bare string on very old clusters.
struct ApiError {
    kind: Option<String>,
    reason: String,
}

impl ApiError {
    fn parse(body: &str) -> Self {
        let error = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").cloned());
        match error {
            Some(Value::Object(obj)) => Self {
                kind: obj.get("type").and_then(Value::as_str).map(str::to_string),
                reason: obj
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| body.to_string()),
            },
            Some(Value::String(s)) => Self { kind: None, reason: s },
            _ => Self {
                kind: None,
                reason: body.to_string(),
            },
        }
    }
}

async fn api_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Api { status, body }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn create_index(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<CreateOutcome, StoreError> {
        let response = self
            .authorize(self.client.put(format!("{}/{}", self.base_url, index)))
            .json(&schema.to_create_body())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(CreateOutcome::Created);
        }
        if response.status() != StatusCode::BAD_REQUEST {
            return Err(api_error(response).await);
        }

        let body = response.text().await.unwrap_or_default();
        match ApiError::parse(&body).kind.as_deref() {
            Some(ALREADY_EXISTS) => Ok(CreateOutcome::AlreadyExists),
            _ => Err(StoreError::Api { status: 400, body }),
        }
    }

    async fn index_document(
        &self,
        index: &str,
        doc: &AccessLogDocument,
    ) -> Result<IndexOutcome, StoreError> {
        let response = self
            .authorize(self.client.post(format!("{}/{}/_doc", self.base_url, index)))
            .json(doc)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::parse(&body);
            let reason = match error.kind {
                Some(kind) => format!("{kind}: {}", error.reason),
                None => error.reason,
            };
            return Ok(IndexOutcome::Rejected { reason });
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: IndexResponse = response.json().await?;
        Ok(IndexOutcome::Indexed { id: parsed.id })
    }
}
