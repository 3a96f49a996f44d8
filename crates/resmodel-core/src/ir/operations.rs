use heck::ToPascalCase;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// `Get`, `Post`, ... for use as a name prefix.
    pub fn pascal_case(&self) -> String {
        self.as_str().to_pascal_case()
    }
}

/// The CRUD semantic inferred for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationType {
    #[default]
    Unknown,
    List,
    Read,
    Create,
    CreateUpdate,
    Update,
    Delete,
}

impl OperationType {
    pub fn from_method(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => OperationType::Read,
            HttpMethod::Post => OperationType::Create,
            HttpMethod::Patch => OperationType::Update,
            HttpMethod::Put => OperationType::CreateUpdate,
            HttpMethod::Delete => OperationType::Delete,
            HttpMethod::Options | HttpMethod::Head | HttpMethod::Trace => OperationType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Unknown => "unknown",
            OperationType::List => "list",
            OperationType::Read => "read",
            OperationType::Create => "create",
            OperationType::CreateUpdate => "create_update",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        }
    }
}

/// One response of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IrResponse {
    /// Numeric status; `2XX` style wildcards are zero-filled, anything
    /// unparsable (e.g. `default`) is `0`.
    pub status: u16,
    pub content_type: Option<String>,
    /// The response schema was titled `Collection of <model>`.
    pub collection: bool,
    pub model_name: Option<String>,
}

impl IrResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An operation on a resource, named for consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrOperation {
    pub name: String,
    pub operation_type: OperationType,
    pub method: HttpMethod,
    /// Path beyond the matched resource ID, or the whole path when nothing
    /// in the registry matched. `None` when the path is a registered ID.
    pub uri_suffix: Option<String>,
    pub request_model: Option<String>,
    pub responses: Vec<IrResponse>,
    pub tags: Vec<String>,
}

impl IrOperation {
    /// Model of the first successful response carrying one.
    pub fn response_model(&self) -> Option<&str> {
        self.responses
            .iter()
            .filter(|r| r.is_success())
            .find_map(|r| r.model_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_from_method() {
        assert_eq!(OperationType::from_method(HttpMethod::Get), OperationType::Read);
        assert_eq!(OperationType::from_method(HttpMethod::Post), OperationType::Create);
        assert_eq!(OperationType::from_method(HttpMethod::Patch), OperationType::Update);
        assert_eq!(
            OperationType::from_method(HttpMethod::Put),
            OperationType::CreateUpdate
        );
        assert_eq!(OperationType::from_method(HttpMethod::Delete), OperationType::Delete);
        assert_eq!(OperationType::from_method(HttpMethod::Head), OperationType::Unknown);
    }

    #[test]
    fn test_method_pascal_case() {
        assert_eq!(HttpMethod::Get.pascal_case(), "Get");
        assert_eq!(HttpMethod::Options.pascal_case(), "Options");
    }

    #[test]
    fn test_response_model_prefers_success() {
        let op = IrOperation {
            name: "GetUser".to_string(),
            operation_type: OperationType::Read,
            method: HttpMethod::Get,
            uri_suffix: None,
            request_model: None,
            responses: vec![
                IrResponse {
                    status: 0,
                    model_name: Some("odataError".to_string()),
                    ..Default::default()
                },
                IrResponse {
                    status: 200,
                    model_name: Some("user".to_string()),
                    ..Default::default()
                },
            ],
            tags: Vec::new(),
        };
        assert_eq!(op.response_model(), Some("user"));
    }
}
