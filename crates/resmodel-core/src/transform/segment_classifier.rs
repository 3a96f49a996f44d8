use crate::ir::{Segment, SegmentType};

use super::heuristics::Heuristics;

/// Classify one raw path component given the segment before it.
///
/// Classification is total: anything that fits no other rule is a
/// [`SegmentType::StaticLiteral`].
pub fn classify_segment(raw: &str, previous: Option<&Segment>, heuristics: &Heuristics) -> Segment {
    if raw.eq_ignore_ascii_case("{subscriptionId}") {
        return Segment::new(SegmentType::SubscriptionId, "subscriptionId", raw);
    }

    if follows_providers(previous) && is_namespace_token(raw) {
        return Segment::new(SegmentType::ResourceProvider, raw, raw);
    }

    if let Some(open) = raw.find('(') {
        let head = &raw[..open];
        let name = heuristics.strip_cast_prefix(head).unwrap_or(head);
        return Segment::new(SegmentType::Function, name, raw);
    }

    // Checked before the `$` cast rule so `$ref` stays a reference.
    if raw.contains('@') || heuristics.is_odata_keyword(raw) {
        let name = raw.trim_start_matches('$');
        return Segment::new(SegmentType::ODataReference, name, raw);
    }

    if let Some(name) = raw.strip_prefix('$') {
        return Segment::new(SegmentType::Cast, name, raw);
    }
    if let Some(name) = heuristics.strip_cast_prefix(raw) {
        return Segment::new(SegmentType::Cast, name, raw);
    }

    if let Some(name) = placeholder_name(raw) {
        return Segment::new(SegmentType::UserValue, name, raw);
    }

    if is_collection_noun(raw, previous, heuristics) {
        Segment::new(SegmentType::Label, raw, raw)
    } else {
        Segment::new(SegmentType::StaticLiteral, raw, raw)
    }
}

fn follows_providers(previous: Option<&Segment>) -> bool {
    previous.is_some_and(|p| {
        p.segment_type == SegmentType::StaticLiteral && p.raw.eq_ignore_ascii_case("providers")
    })
}

/// `Microsoft.App`, `Microsoft.Network`: dot-separated identifier parts.
fn is_namespace_token(raw: &str) -> bool {
    raw.contains('.')
        && raw
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// The text inside `{...}`, when `raw` is exactly one well-formed placeholder.
fn placeholder_name(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix('{')?.strip_suffix('}')?.trim();
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(inner)
}

/// A plural noun-like literal where a collection can begin: at the start of
/// the path, or after a placeholder, a resource provider, or a navigation
/// literal that is not itself a reserved keyword.
fn is_collection_noun(raw: &str, previous: Option<&Segment>, heuristics: &Heuristics) -> bool {
    if !is_noun_like(raw) || heuristics.is_static_keyword(raw) || !heuristics.is_plural(raw) {
        return false;
    }
    match previous {
        None => true,
        Some(p) => match p.segment_type {
            SegmentType::UserValue | SegmentType::SubscriptionId | SegmentType::ResourceProvider => {
                true
            }
            SegmentType::StaticLiteral => !heuristics.is_static_keyword(&p.raw),
            SegmentType::Label
            | SegmentType::Cast
            | SegmentType::Function
            | SegmentType::ODataReference => false,
        },
    }
}

fn is_noun_like(raw: &str) -> bool {
    let mut chars = raw.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_all(raws: &[&str]) -> Vec<SegmentType> {
        let heuristics = Heuristics::default();
        let mut out: Vec<Segment> = Vec::new();
        for raw in raws {
            let seg = classify_segment(raw, out.last(), &heuristics);
            out.push(seg);
        }
        out.into_iter().map(|s| s.segment_type).collect()
    }

    #[test]
    fn test_subscription_id_case_insensitive() {
        let heuristics = Heuristics::default();
        let seg = classify_segment("{SubscriptionID}", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::SubscriptionId);
        assert_eq!(seg.name, "subscriptionId");
        assert_eq!(seg.raw, "{SubscriptionID}");
    }

    #[test]
    fn test_arm_path() {
        use SegmentType::*;
        assert_eq!(
            classify_all(&[
                "subscriptions",
                "{subscriptionId}",
                "resourceGroups",
                "{resourceGroupName}",
                "providers",
                "Microsoft.App",
                "containerApps",
                "{containerAppName}",
            ]),
            vec![
                StaticLiteral,
                SubscriptionId,
                StaticLiteral,
                UserValue,
                StaticLiteral,
                ResourceProvider,
                Label,
                UserValue,
            ]
        );
    }

    #[test]
    fn test_graph_path() {
        use SegmentType::*;
        assert_eq!(
            classify_all(&["users", "{user-id}", "messages", "{message-id}", "attachments"]),
            vec![Label, UserValue, Label, UserValue, Label]
        );
    }

    #[test]
    fn test_singular_navigation_is_static() {
        use SegmentType::*;
        assert_eq!(
            classify_all(&["users", "{user-id}", "manager", "directReports"]),
            vec![Label, UserValue, StaticLiteral, Label]
        );
    }

    #[test]
    fn test_irregular_plural_is_a_collection() {
        use SegmentType::*;
        assert_eq!(
            classify_all(&["users", "{user-id}", "children", "{child-id}", "people"]),
            vec![Label, UserValue, Label, UserValue, Label]
        );
    }

    #[test]
    fn test_function_segment() {
        let heuristics = Heuristics::default();
        let seg = classify_segment(
            "microsoft.graph.reminderView(StartDateTime='{StartDateTime}')",
            None,
            &heuristics,
        );
        assert_eq!(seg.segment_type, SegmentType::Function);
        assert_eq!(seg.name, "reminderView");

        let seg = classify_segment("delta()", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::Function);
        assert_eq!(seg.name, "delta");
    }

    #[test]
    fn test_cast_segments() {
        let heuristics = Heuristics::default();
        let seg = classify_segment("microsoft.graph.group", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::Cast);
        assert_eq!(seg.name, "group");

        let seg = classify_segment("$count", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::Cast);
        assert_eq!(seg.name, "count");
    }

    #[test]
    fn test_odata_reference() {
        let heuristics = Heuristics::default();
        let seg = classify_segment("$ref", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::ODataReference);
        assert_eq!(seg.name, "ref");

        let seg = classify_segment("members@delta", None, &heuristics);
        assert_eq!(seg.segment_type, SegmentType::ODataReference);
    }

    #[test]
    fn test_malformed_tokens_degrade_to_static() {
        use SegmentType::*;
        let heuristics = Heuristics::default();
        for raw in ["{unclosed", "{}", "pre{fix}", "{{double}}", "v1.0"] {
            let seg = classify_segment(raw, None, &heuristics);
            assert_eq!(seg.segment_type, StaticLiteral, "token {raw:?}");
        }
    }

    #[test]
    fn test_provider_needs_providers_literal() {
        use SegmentType::*;
        assert_eq!(
            classify_all(&["tenants", "Microsoft.App"]),
            vec![Label, StaticLiteral]
        );
    }

    #[test]
    fn test_label_not_after_label() {
        use SegmentType::*;
        assert_eq!(classify_all(&["users", "items"]), vec![Label, StaticLiteral]);
    }
}
