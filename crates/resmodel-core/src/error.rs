use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("operation {operation:?} not found on resource {resource:?}")]
    OperationNotFound { resource: String, operation: String },

    #[error("model {model:?} referenced by resource {resource:?} is not a known model")]
    MissingModel { resource: String, model: String },

    #[error("resource ID segment {segment:?} of resource {resource:?} has no matching field")]
    MissingIdField { resource: String, segment: String },
}

/// A resolution failure scoped to one resource. Collected alongside the
/// resource model so sibling resources still resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource {resource:?}: {source}")]
pub struct ResourceError {
    pub resource: String,
    pub operation: Option<String>,
    pub source: ResolveError,
}

impl ResourceError {
    pub fn new(resource: impl Into<String>, source: ResolveError) -> Self {
        Self {
            resource: resource.into(),
            operation: None,
            source,
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml_ng::Error,
    },
}
