//! Fallible lookups over a resolved resource model.
//!
//! Nothing here panics on a missing operation, model or field; each miss is a
//! [`ResourceError`] naming the resource, so one bad resource does not stop
//! the others from being processed.

use std::collections::BTreeMap;

use crate::error::{ResolveError, ResourceError};
use crate::ir::{IrOperation, IrResource, OperationType, ResourceModel, SegmentType};

use super::models::Models;
use super::name_normalizer::comparable_name;

impl IrResource {
    /// The operation called `name`.
    pub fn operation(&self, name: &str) -> Result<&IrOperation, ResourceError> {
        self.operations.iter().find(|op| op.name == name).ok_or_else(|| {
            ResourceError::new(
                &self.name,
                ResolveError::OperationNotFound {
                    resource: self.name.clone(),
                    operation: name.to_string(),
                },
            )
        })
    }

    /// The first Read operation on the resource's own ID.
    pub fn read_operation(&self) -> Result<&IrOperation, ResourceError> {
        self.operations
            .iter()
            .filter(|op| op.operation_type == OperationType::Read)
            .min_by_key(|op| op.uri_suffix.is_some())
            .ok_or_else(|| {
                ResourceError::new(
                    &self.name,
                    ResolveError::OperationNotFound {
                        resource: self.name.clone(),
                        operation: OperationType::Read.as_str().to_string(),
                    },
                )
            })
    }
}

/// A resource ID placeholder paired with the model field carrying its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdFieldMapping {
    pub segment: String,
    pub field: String,
}

/// Pair every UserValue segment of the resource ID with one of `fields`.
///
/// Names are compared in snake_case. The terminal placeholder may also match
/// on its last word alone, so `{user-id}` maps to an `id` field.
/// Subscription IDs are not model fields and are skipped.
pub fn map_id_segments(
    resource: &IrResource,
    fields: &[String],
) -> Result<Vec<IdFieldMapping>, ResourceError> {
    let id = resource.id.as_ref().ok_or_else(|| {
        ResourceError::new(&resource.name, ResolveError::ResourceNotFound(resource.name.clone()))
    })?;

    let comparable: Vec<(String, &String)> =
        fields.iter().map(|f| (comparable_name(f), f)).collect();
    let terminal = id.len().saturating_sub(1);

    let mut mappings = Vec::new();
    for (i, segment) in id.segments.iter().enumerate() {
        if segment.segment_type != SegmentType::UserValue {
            continue;
        }
        let wanted = comparable_name(&segment.name);
        let mut field = comparable.iter().find(|(c, _)| *c == wanted);
        if field.is_none() && i == terminal {
            let last_word = wanted.rsplit('_').next().unwrap_or(&wanted);
            field = comparable.iter().find(|(c, _)| c == last_word);
        }
        match field {
            Some((_, name)) => mappings.push(IdFieldMapping {
                segment: segment.name.clone(),
                field: (*name).clone(),
            }),
            None => {
                return Err(ResourceError::new(
                    &resource.name,
                    ResolveError::MissingIdField {
                        resource: resource.name.clone(),
                        segment: segment.name.clone(),
                    },
                ));
            }
        }
    }
    Ok(mappings)
}

/// Map the ID placeholders of every addressable resource onto the fields of
/// the model its Read operation returns.
///
/// Resources without an ID, without a Read operation or whose Read returns no
/// model are left out. Failures are collected per resource.
pub fn read_model_mappings(
    model: &ResourceModel,
    models: &Models,
) -> (BTreeMap<String, Vec<IdFieldMapping>>, Vec<ResourceError>) {
    let mut mappings = BTreeMap::new();
    let mut errors = Vec::new();

    for resource in model.resources.values() {
        if resource.id.is_none() {
            continue;
        }
        let Ok(read) = resource.read_operation() else {
            log::debug!("resource {:?} has no read operation", resource.name);
            continue;
        };
        let Some(model_name) = read.response_model() else {
            continue;
        };

        let result = models
            .fields(model_name)
            .ok_or_else(|| {
                ResourceError::new(
                    &resource.name,
                    ResolveError::MissingModel {
                        resource: resource.name.clone(),
                        model: model_name.to_string(),
                    },
                )
            })
            .and_then(|fields| map_id_segments(resource, fields));

        match result {
            Ok(found) => {
                mappings.insert(resource.name.clone(), found);
            }
            Err(error) => errors.push(error.with_operation(&read.name)),
        }
    }

    (mappings, errors)
}
