use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::segment::{Segment, SegmentType};

/// Structured identity of a path template: its classified segments plus the
/// operation tags seen alongside it.
///
/// Two IDs are equal when their canonical strings are equal; tags do not take
/// part in identity.
#[derive(Debug, Clone, Default)]
pub struct ResourceId {
    pub segments: Vec<Segment>,
    pub tags: BTreeSet<String>,
}

impl ResourceId {
    pub fn new(segments: Vec<Segment>, tags: impl IntoIterator<Item = String>) -> Self {
        Self {
            segments,
            tags: tags.into_iter().collect(),
        }
    }

    /// Canonical string form, e.g. `/users/{user-id}/messages`.
    pub fn id(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| format!("/{}", s.canonical()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn last_segment_type(&self) -> Option<SegmentType> {
        self.last_segment().map(|s| s.segment_type)
    }

    /// The trailing segments from `start` onwards, carrying this ID's tags.
    pub fn suffix(&self, start: usize) -> ResourceId {
        ResourceId {
            segments: self.segments.get(start..).unwrap_or_default().to_vec(),
            tags: self.tags.clone(),
        }
    }

    /// Truncate to the last segment of one of `types` found strictly before
    /// index `before`, keeping that segment. `None` when no such segment exists.
    pub fn truncate_to_last_segment_of_type_before(
        &self,
        types: &[SegmentType],
        before: usize,
    ) -> Option<ResourceId> {
        let end = before.min(self.segments.len());
        let position = self.segments[..end]
            .iter()
            .rposition(|s| types.contains(&s.segment_type))?;
        Some(ResourceId {
            segments: self.segments[..=position].to_vec(),
            tags: self.tags.clone(),
        })
    }

    /// Truncate to the nearest Label preceding the terminal segment.
    pub fn parent_label_path(&self) -> Option<ResourceId> {
        let terminal = self.segments.len().checked_sub(1)?;
        self.truncate_to_last_segment_of_type_before(&[SegmentType::Label], terminal)
    }

    pub fn contains_type(&self, segment_type: SegmentType) -> bool {
        self.segments.iter().any(|s| s.segment_type == segment_type)
    }
}

impl PartialEq for ResourceId {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ResourceId {}

impl Hash for ResourceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Segment {
        Segment::new(SegmentType::Label, name, name)
    }

    fn value(name: &str) -> Segment {
        Segment::new(SegmentType::UserValue, name, format!("{{{name}}}"))
    }

    fn literal(name: &str) -> Segment {
        Segment::new(SegmentType::StaticLiteral, name, name)
    }

    #[test]
    fn test_id_joins_canonical_segments() {
        let id = ResourceId::new(vec![label("users"), value("user-id")], Vec::new());
        assert_eq!(id.id(), "/users/{user-id}");
        assert_eq!(ResourceId::default().id(), "/");
    }

    #[test]
    fn test_equality_ignores_tags() {
        let a = ResourceId::new(vec![label("users")], vec!["users.user".to_string()]);
        let b = ResourceId::new(vec![label("users")], Vec::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_suffix() {
        let id = ResourceId::new(
            vec![label("users"), value("id"), label("messages"), value("id2")],
            Vec::new(),
        );
        assert_eq!(id.suffix(2).id(), "/messages/{id2}");
        assert!(id.suffix(4).is_empty());
        assert!(id.suffix(9).is_empty());
    }

    #[test]
    fn test_parent_label_path_skips_terminal() {
        let id = ResourceId::new(
            vec![label("users"), value("id"), label("messages")],
            Vec::new(),
        );
        assert_eq!(id.parent_label_path().unwrap().id(), "/users");

        let id = ResourceId::new(
            vec![label("users"), value("id"), literal("manager"), literal("$ref")],
            Vec::new(),
        );
        assert_eq!(id.parent_label_path().unwrap().id(), "/users");
    }

    #[test]
    fn test_parent_label_path_none_without_label() {
        let id = ResourceId::new(vec![label("users")], Vec::new());
        assert!(id.parent_label_path().is_none());
        assert!(ResourceId::default().parent_label_path().is_none());
    }
}
