use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// One entry of a `content` map. Examples and encodings are not read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

/// Whether a content type carries JSON (`application/json`, optionally with
/// parameters such as `; charset=utf-8`).
pub fn is_json(content_type: &str) -> bool {
    content_type
        .to_ascii_lowercase()
        .starts_with("application/json")
}
