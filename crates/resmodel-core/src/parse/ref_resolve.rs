use std::collections::HashSet;

use indexmap::IndexMap;

use super::body::{RefOr, RequestBody, Response};
use super::schema::{Schema, SchemaOrRef};
use super::spec::{Components, OpenApiSpec};
use crate::error::ResolveError;

/// Follows `$ref` pointers into `#/components/...` without cloning the document.
///
/// Resolution is lazy: extraction only needs the response/request body a
/// pointer lands on and the title of a schema, never a fully inlined tree.
#[derive(Debug, Clone, Copy)]
pub struct RefLookup<'a> {
    components: Option<&'a Components>,
}

impl<'a> RefLookup<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    /// Resolve a response, following chained references.
    pub fn response(&self, response: &'a RefOr<Response>) -> Result<&'a Response, ResolveError> {
        self.follow(response, "responses", |c| &c.responses)
    }

    /// Resolve a request body, following chained references.
    pub fn request_body(
        &self,
        body: &'a RefOr<RequestBody>,
    ) -> Result<&'a RequestBody, ResolveError> {
        self.follow(body, "requestBodies", |c| &c.request_bodies)
    }

    fn follow<T>(
        &self,
        start: &'a RefOr<T>,
        section: &str,
        table: impl Fn(&'a Components) -> &'a IndexMap<String, RefOr<T>>,
    ) -> Result<&'a T, ResolveError> {
        let mut visited = HashSet::new();
        let mut current = start;
        loop {
            let ref_path = match current {
                RefOr::Item(item) => return Ok(item),
                RefOr::Ref { ref_path } => ref_path,
            };
            if !visited.insert(ref_path.as_str()) {
                return Err(ResolveError::CircularRef(ref_path.clone()));
            }
            let name = parse_ref_name(ref_path, section)?;
            current = self
                .components
                .and_then(|c| table(c).get(name))
                .ok_or_else(|| ResolveError::UnresolvedRef(ref_path.clone()))?;
        }
    }

    /// Look up a component schema by `$ref` path, returning its key and body.
    pub fn schema(&self, ref_path: &str) -> Result<(&'a str, &'a SchemaOrRef), ResolveError> {
        let name = parse_ref_name(ref_path, "schemas")?;
        self.components
            .and_then(|c| c.schemas.get_key_value(name))
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ResolveError::UnresolvedRef(ref_path.to_string()))
    }

    /// The type name carried by a schema.
    ///
    /// An explicit `title` wins; otherwise the first titled inline `allOf`
    /// member, or the sole non-null `oneOf`/`anyOf` member. A reference whose
    /// target has no title falls back to the component key.
    pub fn schema_title(&self, schema: &'a SchemaOrRef) -> Result<Option<String>, ResolveError> {
        let mut visited = HashSet::new();
        self.title_of(schema, &mut visited)
    }

    fn title_of(
        &self,
        schema: &'a SchemaOrRef,
        visited: &mut HashSet<&'a str>,
    ) -> Result<Option<String>, ResolveError> {
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                // A revisited reference contributes nothing rather than failing.
                if !visited.insert(ref_path.as_str()) {
                    return Ok(None);
                }
                let (key, target) = self.schema(ref_path)?;
                Ok(Some(
                    self.title_of(target, visited)?
                        .unwrap_or_else(|| key.to_string()),
                ))
            }
            SchemaOrRef::Schema(s) => self.inline_title(s, visited),
        }
    }

    fn inline_title(
        &self,
        schema: &'a Schema,
        visited: &mut HashSet<&'a str>,
    ) -> Result<Option<String>, ResolveError> {
        let own_title = schema.title.as_deref().map(str::trim);
        if let Some(title) = own_title.filter(|t| !t.is_empty()) {
            return Ok(Some(title.to_string()));
        }

        // Referenced allOf members are base types and never name the schema.
        for member in &schema.all_of {
            if let SchemaOrRef::Schema(inline) = member {
                if let Some(title) = self.inline_title(inline, visited)? {
                    return Ok(Some(title));
                }
            }
        }

        let alternatives = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        let mut non_null = alternatives.iter().filter(|alt| match alt {
            SchemaOrRef::Schema(s) => !s.is_null_only(),
            SchemaOrRef::Ref { .. } => true,
        });
        match (non_null.next(), non_null.next()) {
            (Some(only), None) => self.title_of(only, visited),
            _ => Ok(None),
        }
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SPEC: &str = r##"
openapi: "3.0.1"
info:
  title: Refs
  version: "1.0"
paths: {}
components:
  schemas:
    microsoft.graph.user:
      type: object
      properties:
        id:
          type: string
    microsoft.graph.message:
      title: message
      type: object
    titledViaAllOf:
      allOf:
        - $ref: '#/components/schemas/microsoft.graph.message'
        - title: derived
          type: object
    selfLoop:
      allOf:
        - $ref: '#/components/schemas/selfLoop'
  responses:
    userResponse:
      description: ok
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/microsoft.graph.user'
    alias:
      $ref: '#/components/responses/userResponse'
    loopA:
      $ref: '#/components/responses/loopB'
    loopB:
      $ref: '#/components/responses/loopA'
"##;

    fn schema_ref(name: &str) -> SchemaOrRef {
        SchemaOrRef::Ref {
            ref_path: format!("#/components/schemas/{name}"),
        }
    }

    #[test]
    fn test_title_falls_back_to_component_key() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let title = lookup
            .schema_title(&schema_ref("microsoft.graph.user"))
            .unwrap();
        assert_eq!(title.as_deref(), Some("microsoft.graph.user"));
    }

    #[test]
    fn test_explicit_title_wins() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let title = lookup
            .schema_title(&schema_ref("microsoft.graph.message"))
            .unwrap();
        assert_eq!(title.as_deref(), Some("message"));
    }

    #[test]
    fn test_title_through_inline_all_of_member() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let title = lookup.schema_title(&schema_ref("titledViaAllOf")).unwrap();
        assert_eq!(title.as_deref(), Some("derived"));
    }

    #[test]
    fn test_referenced_base_type_does_not_name_schema() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let inline = SchemaOrRef::Schema(Box::new(Schema {
            all_of: vec![schema_ref("microsoft.graph.message")],
            ..Default::default()
        }));
        assert_eq!(lookup.schema_title(&inline).unwrap(), None);
    }

    #[test]
    fn test_title_of_nullable_any_of() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let null_arm = SchemaOrRef::Schema(Box::new(Schema {
            nullable: Some(true),
            ..Default::default()
        }));
        let inline = SchemaOrRef::Schema(Box::new(Schema {
            any_of: vec![schema_ref("microsoft.graph.message"), null_arm],
            ..Default::default()
        }));
        assert_eq!(
            lookup.schema_title(&inline).unwrap().as_deref(),
            Some("message")
        );
    }

    #[test]
    fn test_self_referencing_schema_terminates() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let title = lookup.schema_title(&schema_ref("selfLoop")).unwrap();
        assert_eq!(title.as_deref(), Some("selfLoop"));
    }

    #[test]
    fn test_missing_schema_is_unresolved() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let err = lookup.schema_title(&schema_ref("nope")).unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedRef(_)));
    }

    #[test]
    fn test_response_chain() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let alias: RefOr<Response> = RefOr::Ref {
            ref_path: "#/components/responses/alias".to_string(),
        };
        let response = lookup.response(&alias).unwrap();
        assert!(response.content.contains_key("application/json"));
    }

    #[test]
    fn test_response_cycle_detected() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let lookup = RefLookup::new(&spec);
        let looped: RefOr<Response> = RefOr::Ref {
            ref_path: "#/components/responses/loopA".to_string(),
        };
        assert!(matches!(
            lookup.response(&looped),
            Err(ResolveError::CircularRef(_))
        ));
    }

    #[test]
    fn test_wrong_section_is_invalid() {
        let err = parse_ref_name("#/components/responses/x", "schemas").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRefFormat(_)));
        let err = parse_ref_name("definitions/x", "schemas").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRefFormat(_)));
    }
}
