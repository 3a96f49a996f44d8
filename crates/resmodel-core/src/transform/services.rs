use std::collections::{BTreeMap, BTreeSet};

use crate::parse::spec::OpenApiSpec;

/// Maps operation tags to the service they belong to.
///
/// A tag declared in the global tag list with an `x-service` extension belongs
/// to that service; any other tag belongs to the text before its first `.`
/// (`users.message` → `users`).
#[derive(Debug, Clone, Default)]
pub struct ServiceIndex {
    explicit: BTreeMap<String, String>,
}

impl ServiceIndex {
    pub fn from_spec(spec: &OpenApiSpec) -> Self {
        let explicit = spec
            .tags
            .iter()
            .filter_map(|tag| {
                let service = tag.service.as_deref()?.trim();
                (!service.is_empty())
                    .then(|| (tag.name.to_ascii_lowercase(), service.to_string()))
            })
            .collect();
        Self { explicit }
    }

    pub fn service_of<'t>(&'t self, tag: &'t str) -> &'t str {
        if let Some(service) = self.explicit.get(&tag.to_ascii_lowercase()) {
            return service;
        }
        tag.split('.').next().unwrap_or(tag).trim()
    }

    /// Restrict the index to one service.
    pub fn scope<'a>(&'a self, service: &'a str) -> ServiceScope<'a> {
        ServiceScope {
            service,
            index: self,
        }
    }
}

/// One service being processed, able to decide which operations belong to it.
#[derive(Debug, Clone, Copy)]
pub struct ServiceScope<'a> {
    pub service: &'a str,
    index: &'a ServiceIndex,
}

impl ServiceScope<'_> {
    /// Whether any of `tags` belongs to this service.
    pub fn matches(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.owns(tag))
    }

    pub fn owns(&self, tag: &str) -> bool {
        tag_matches(self.index.service_of(tag), self.service)
    }
}

/// Case-insensitive service name comparison.
pub fn tag_matches(tag_service: &str, service: &str) -> bool {
    !service.is_empty() && tag_service.eq_ignore_ascii_case(service)
}

/// Every service named by the global tag list or an operation tag, with the
/// tags that belong to it. Both levels are sorted.
///
/// Service names that differ only in case are one service, listed under the
/// spelling that sorts first.
pub fn discover_services(spec: &OpenApiSpec, index: &ServiceIndex) -> BTreeMap<String, Vec<String>> {
    let declared = spec.tags.iter().map(|t| t.name.as_str());
    let used = spec
        .paths
        .values()
        .flat_map(|item| item.operations())
        .flat_map(|(_, op)| op.tags.iter().map(String::as_str));

    let mut services: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();
    for tag in declared.chain(used) {
        let service = index.service_of(tag);
        if service.is_empty() {
            continue;
        }
        let (spellings, tags) = services.entry(service.to_ascii_lowercase()).or_default();
        spellings.insert(service.to_string());
        tags.insert(tag.to_string());
    }

    services
        .into_values()
        .filter_map(|(spellings, tags)| {
            let name = spellings.into_iter().next()?;
            Some((name, tags.into_iter().collect()))
        })
        .collect()
}

/// Apply a service filter to the discovered names. An empty filter selects
/// everything; otherwise names are compared case-insensitively.
pub fn select_services<'a>(
    discovered: impl IntoIterator<Item = &'a String>,
    filter: &[String],
) -> Vec<String> {
    discovered
        .into_iter()
        .filter(|name| filter.is_empty() || filter.iter().any(|f| tag_matches(name, f)))
        .cloned()
        .collect()
}
