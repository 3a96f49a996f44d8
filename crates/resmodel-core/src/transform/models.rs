use std::collections::BTreeMap;

use crate::parse::ref_resolve::RefLookup;
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::spec::OpenApiSpec;

use super::heuristics::Heuristics;
use super::name_normalizer::clean_model_name;

/// Reference chains or `allOf` nesting deeper than this are treated as cycles.
const MAX_DEPTH: usize = 16;

/// Registry of reusable model names with their top-level field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Models {
    models: BTreeMap<String, Vec<String>>,
}

impl Models {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every component schema under its cleaned key, and under its
    /// cleaned title when that is a different single word. Fields are the
    /// schema's own properties followed by those inherited through `allOf`.
    pub fn from_spec(spec: &OpenApiSpec, heuristics: &Heuristics) -> Self {
        let lookup = RefLookup::new(spec);
        let mut models = Models::new();
        let Some(components) = &spec.components else {
            return models;
        };

        for (key, schema) in &components.schemas {
            let Some(body) = inline(&lookup, schema) else {
                log::debug!("skipping model {key:?}: reference does not resolve");
                continue;
            };
            let fields = fields_of(&lookup, body);

            let name = clean_model_name(key, heuristics);
            if let Some(title) = body.title.as_deref().map(|t| clean_model_name(t, heuristics)) {
                if !title.is_empty() && !title.contains(char::is_whitespace) && title != name {
                    models.insert(title, fields.clone());
                }
            }
            models.insert(name, fields);
        }
        models
    }

    /// Register a model, merging fields with any earlier registration.
    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<String>) {
        let entry = self.models.entry(name.into()).or_default();
        for field in fields {
            if !entry.contains(&field) {
                entry.push(field);
            }
        }
    }

    pub fn found(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn fields(&self, name: &str) -> Option<&[String]> {
        self.models.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Models {
    /// A registry of field-less names, handy when only membership matters.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut models = Models::new();
        for name in iter {
            models.insert(name, Vec::new());
        }
        models
    }
}

/// The inline body a schema lands on after following references.
fn inline<'a>(lookup: &RefLookup<'a>, schema: &'a SchemaOrRef) -> Option<&'a Schema> {
    let mut current = schema;
    for _ in 0..MAX_DEPTH {
        match current {
            SchemaOrRef::Schema(s) => return Some(s),
            SchemaOrRef::Ref { ref_path } => current = lookup.schema(ref_path).ok()?.1,
        }
    }
    None
}

fn fields_of<'a>(lookup: &RefLookup<'a>, schema: &'a Schema) -> Vec<String> {
    let mut fields = Vec::new();
    collect_fields(lookup, schema, &mut fields, 0);
    fields
}

/// Own properties first, then each `allOf` member's, depth first.
fn collect_fields<'a>(
    lookup: &RefLookup<'a>,
    schema: &'a Schema,
    fields: &mut Vec<String>,
    depth: usize,
) {
    for field in schema.properties.keys() {
        if !fields.contains(field) {
            fields.push(field.clone());
        }
    }
    if depth >= MAX_DEPTH {
        return;
    }
    for member in &schema.all_of {
        if let Some(body) = inline(lookup, member) {
            collect_fields(lookup, body, fields, depth + 1);
        }
    }
}
