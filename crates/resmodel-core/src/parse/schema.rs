use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` keyword: one name, or a list of names in OpenAPI 3.1.
/// Names are kept verbatim; only `null` is ever interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    fn is_null(&self) -> bool {
        match self {
            TypeSet::Single(t) => t == "null",
            TypeSet::Multiple(types) => types.iter().all(|t| t == "null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// The subset of a JSON Schema object the importer inspects: enough to
/// recover a type name and the field names of a model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl Schema {
    /// A schema that only admits `null` (`type: null` or `nullable` with no
    /// other shape). Used to skip the null arm of `anyOf: [X, null]`.
    pub fn is_null_only(&self) -> bool {
        match &self.schema_type {
            Some(types) => types.is_null(),
            None => {
                self.nullable == Some(true)
                    && self.title.is_none()
                    && self.properties.is_empty()
                    && self.all_of.is_empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(yaml: &str) -> Schema {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_null_only() {
        assert!(schema("type: 'null'").is_null_only());
        assert!(schema("type: ['null']").is_null_only());
        assert!(schema("nullable: true").is_null_only());
        assert!(!schema("type: [string, 'null']").is_null_only());
        assert!(!schema("type: object\nnullable: true").is_null_only());
        assert!(!schema("nullable: true\ntitle: user").is_null_only());
    }

    #[test]
    fn test_unknown_keywords_are_ignored() {
        let s = schema("type: string\nformat: date-time\nmaxLength: 3\ndescription: when");
        assert_eq!(s.schema_type, Some(TypeSet::Single("string".to_string())));
    }
}
