use std::collections::BTreeMap;

use super::operations::IrOperation;
use super::resource_id::ResourceId;
use crate::error::ResourceError;

/// A named resource discovered within one (service, API version) scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrResource {
    pub name: String,
    /// Grouping label; empty when no grouping could be inferred.
    pub category: String,
    pub version: String,
    pub service: String,
    /// Most specific registered ID matched by any of this resource's paths.
    pub id: Option<ResourceId>,
    pub paths: Vec<ResourceId>,
    pub operations: Vec<IrOperation>,
}

impl IrResource {
    pub fn new(name: impl Into<String>, service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            version: version.into(),
            service: service.into(),
            id: None,
            paths: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

/// The resolved resources of one (service, API version) scope, plus the
/// per-resource errors collected while building them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceModel {
    pub service: String,
    pub api_version: String,
    pub resources: BTreeMap<String, IrResource>,
    pub errors: Vec<ResourceError>,
}

impl ResourceModel {
    pub fn new(service: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            api_version: api_version.into(),
            resources: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&IrResource> {
        self.resources.get(name)
    }

    /// Number of operations across every resource.
    pub fn operation_count(&self) -> usize {
        self.resources.values().map(|r| r.operations.len()).sum()
    }
}
