//! Serde model of the parts of an OpenAPI 3.x document that resource
//! extraction reads. Everything else in the document is ignored.

pub mod body;
pub mod media_type;
pub mod operation;
pub mod ref_resolve;
pub mod schema;
pub mod spec;

use std::path::Path;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Serialization of a spec document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// `.json` files are JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

pub fn parse(input: &str, format: SpecFormat) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = match format {
        SpecFormat::Yaml => serde_yaml_ng::from_str(input)?,
        SpecFormat::Json => serde_json::from_str(input)?,
    };
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi));
    }
    Ok(spec)
}

pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    parse(input, SpecFormat::Yaml)
}

pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    parse(input, SpecFormat::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SpecFormat::from_path(Path::new("api.json")), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("api.JSON")), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("api.yml")), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path(Path::new("openapi")), SpecFormat::Yaml);
    }

    #[test]
    fn test_swagger_2_is_rejected() {
        let err = from_yaml("swagger: '2.0'\nopenapi: '2.0'\ninfo:\n  title: t\n  version: '1'\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn test_json_document() {
        let spec = from_json(
            r#"{"openapi": "3.1.0", "info": {"title": "t", "version": "v1"}, "paths": {"/users": {}}}"#,
        )
        .unwrap();
        assert_eq!(spec.info.version, "v1");
        assert!(spec.paths.contains_key("/users"));
        assert!(spec.components.is_none());
    }
}
