use serde::Serialize;
use serde_json::{json, Map, Value};

/// Store-side field types used by the access log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Date,
    Ip,
    Text,
    Integer,
    Long,
}

/// Field-type table declared when the index is created.
///
/// Only listed fields are constrained; the index stays dynamic so extra
/// fields in a record are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    fields: Vec<(&'static str, FieldType)>,
}

impl IndexSchema {
    /// The fixed schema for web server access logs.
    pub fn access_log() -> Self {
        Self {
            fields: vec![
                ("time", FieldType::Date),
                ("remote_ip", FieldType::Ip),
                ("remote_user", FieldType::Text),
                ("request", FieldType::Text),
                ("response", FieldType::Integer),
                ("bytes", FieldType::Long),
                ("referrer", FieldType::Text),
                ("agent", FieldType::Text),
            ],
        }
    }

    /// Body of the index creation request.
    pub fn to_create_body(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.to_string(), json!({ "type": ty })))
            .collect();
        json!({ "mappings": { "properties": properties } })
    }
}
