use crate::ir::{ResourceId, Segment, SegmentType};

use super::heuristics::Heuristics;
use super::name_normalizer::clean_name;
use super::segment_classifier::classify_segment;

/// Tokenize a path template into a classified [`ResourceId`], attaching the
/// operation tags seen on it. Empty components (`//`, leading or trailing
/// slashes) are ignored.
pub fn parse_path<I, S>(path: &str, tags: I, heuristics: &Heuristics) -> ResourceId
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut segments: Vec<Segment> = Vec::new();
    for raw in path.split('/').filter(|s| !s.is_empty()) {
        let segment = classify_segment(raw, segments.last(), heuristics);
        segments.push(segment);
    }
    ResourceId::new(segments, tags.into_iter().map(Into::into))
}

/// Candidate resource name for a parsed path.
///
/// Scanning from the end, the anchor is the first Label, or the first
/// UserValue directly preceded by a Label; the anchor's collection noun is
/// singularized and PascalCased. Static literals after the anchor qualify the
/// name (`/users/{id}/manager` → `UserManager`) and a trailing OData reference
/// appends `Ref`.
///
/// The `Ref` suffix keeps the reference endpoint (`/manager/$ref` →
/// `UserManagerRef`) a separate resource from the navigation it points at
/// (`UserManager`). Operation names drop the suffix again, so removing the
/// reference is `RemoveUserManager`.
///
/// Paths ending in a cast or function are actions, not resources, and yield
/// `None`, as do paths with no anchor.
pub fn find_resource_name(id: &ResourceId, heuristics: &Heuristics) -> Option<String> {
    let last = id.last_segment()?;
    if last.segment_type.is_action() {
        return None;
    }

    let (anchor, noun) = find_anchor(&id.segments)?;
    let mut name = clean_name(&heuristics.singularize(noun));

    for segment in &id.segments[anchor + 1..] {
        match segment.segment_type {
            SegmentType::StaticLiteral => name.push_str(&clean_name(&segment.name)),
            SegmentType::ODataReference => name.push_str("Ref"),
            _ => {}
        }
    }

    Some(name)
}

/// Index of the anchor segment and its collection noun.
fn find_anchor(segments: &[Segment]) -> Option<(usize, &str)> {
    segments
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, segment)| match segment.segment_type {
            SegmentType::Label => Some((i, segment.name.as_str())),
            SegmentType::UserValue => {
                let previous = segments.get(i.checked_sub(1)?)?;
                (previous.segment_type == SegmentType::Label)
                    .then_some((i, previous.name.as_str()))
            }
            _ => None,
        })
}
