use std::collections::BTreeMap;

use crate::ir::{ResourceId, SegmentType};
use crate::parse::spec::OpenApiSpec;

use super::heuristics::Heuristics;
use super::path_parser::parse_path;
use super::services::ServiceScope;

/// Registry of canonical resource IDs for one (service, API version) scope.
///
/// Keyed by canonical string, so traversal is always in sorted order and
/// never depends on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIds {
    ids: BTreeMap<String, ResourceId>,
}

/// Outcome of [`ResourceIds::match_id_or_parent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMatch<'a> {
    /// The registered ID equal to, or the longest prefix of, the path.
    pub id: Option<&'a ResourceId>,
    /// Segments beyond the matched ID; `None` on an exact match or no match.
    pub remainder: Option<ResourceId>,
}

impl IdMatch<'_> {
    pub fn is_match(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_exact(&self) -> bool {
        self.id.is_some() && self.remainder.is_none()
    }
}

impl ResourceIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ID. Re-registering an existing canonical ID merges tags.
    /// Returns `true` when the ID was not known before.
    pub fn insert(&mut self, id: ResourceId) -> bool {
        match self.ids.get_mut(&id.id()) {
            Some(existing) => {
                existing.tags.extend(id.tags);
                false
            }
            None => {
                self.ids.insert(id.id(), id);
                true
            }
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&ResourceId> {
        self.ids.get(canonical)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Registered IDs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.ids.values()
    }

    /// Find the registered ID that equals `path`, or failing that the longest
    /// registered ID that is a segment-wise prefix of it.
    ///
    /// Segments align when [`crate::ir::Segment::is_compatible`] holds, so a
    /// placeholder only lines up with a placeholder. Among equally long
    /// prefixes the first in canonical order wins.
    pub fn match_id_or_parent(&self, path: &ResourceId) -> IdMatch<'_> {
        let mut best: Option<&ResourceId> = None;
        for candidate in self.ids.values() {
            if candidate.is_empty() || candidate.len() > path.len() {
                continue;
            }
            let aligned = candidate
                .segments
                .iter()
                .zip(&path.segments)
                .all(|(c, p)| p.is_compatible(c));
            if !aligned {
                continue;
            }
            if best.is_none_or(|b| candidate.len() > b.len()) {
                best = Some(candidate);
            }
        }

        match best {
            Some(id) if id.len() == path.len() => IdMatch {
                id: Some(id),
                remainder: None,
            },
            Some(id) => IdMatch {
                id: Some(id),
                remainder: Some(path.suffix(id.len())),
            },
            None => IdMatch {
                id: None,
                remainder: None,
            },
        }
    }
}

impl FromIterator<ResourceId> for ResourceIds {
    fn from_iter<T: IntoIterator<Item = ResourceId>>(iter: T) -> Self {
        let mut ids = ResourceIds::new();
        for id in iter {
            ids.insert(id);
        }
        ids
    }
}

/// Build the registry for one service: every tag-matching path that ends in
/// a placeholder and contains no cast or function segment is an ID.
pub fn build_resource_ids(
    scope: &ServiceScope<'_>,
    spec: &OpenApiSpec,
    heuristics: &Heuristics,
) -> ResourceIds {
    let mut ids = ResourceIds::new();
    let mut paths: Vec<&String> = spec.paths.keys().collect();
    paths.sort();

    for path in paths {
        let item = &spec.paths[path.as_str()];
        let tags: Vec<String> = item
            .operations()
            .into_iter()
            .filter(|(_, op)| scope.matches(&op.tags))
            .flat_map(|(_, op)| op.tags.iter().cloned())
            .collect();
        if tags.is_empty() {
            continue;
        }

        let parsed = parse_path(path, tags, heuristics);
        let addressable = parsed
            .last_segment_type()
            .is_some_and(|t| t.is_placeholder());
        let has_action = parsed.contains_type(SegmentType::Cast)
            || parsed.contains_type(SegmentType::Function);
        if addressable && !has_action {
            log::debug!("registered resource ID {} for service {:?}", parsed, scope.service);
            ids.insert(parsed);
        }
    }

    ids
}
