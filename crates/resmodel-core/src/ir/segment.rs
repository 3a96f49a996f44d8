use std::fmt;

/// The role a single `/`-delimited path component plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentType {
    StaticLiteral,
    ResourceProvider,
    SubscriptionId,
    UserValue,
    Label,
    Cast,
    Function,
    ODataReference,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::StaticLiteral => "static",
            SegmentType::ResourceProvider => "resource_provider",
            SegmentType::SubscriptionId => "subscription_id",
            SegmentType::UserValue => "user_value",
            SegmentType::Label => "label",
            SegmentType::Cast => "cast",
            SegmentType::Function => "function",
            SegmentType::ODataReference => "odata_reference",
        }
    }

    /// Segments standing in for a caller-supplied value.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, SegmentType::UserValue | SegmentType::SubscriptionId)
    }

    /// Segments that turn a path into an action rather than a resource.
    pub fn is_action(&self) -> bool {
        matches!(self, SegmentType::Cast | SegmentType::Function)
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub segment_type: SegmentType,
    /// Normalized identifier: placeholder text without braces, function or
    /// cast name without namespace, literal text otherwise.
    pub name: String,
    /// The component exactly as it appeared in the path template.
    pub raw: String,
}

impl Segment {
    pub fn new(segment_type: SegmentType, name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            segment_type,
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// Canonical text used when joining a resource ID.
    pub fn canonical(&self) -> String {
        if self.segment_type.is_placeholder() {
            format!("{{{}}}", self.name)
        } else {
            self.raw.clone()
        }
    }

    /// Whether this segment can stand at the same position as `other` when
    /// matching a path against a registered ID. Placeholders align with
    /// placeholders of the same kind regardless of their names; everything
    /// else must agree on type and (case-insensitively) on text.
    pub fn is_compatible(&self, other: &Segment) -> bool {
        if self.segment_type != other.segment_type {
            return false;
        }
        self.segment_type.is_placeholder() || self.raw.eq_ignore_ascii_case(&other.raw)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_placeholder() {
        let seg = Segment::new(SegmentType::UserValue, "user-id", "{user-id}");
        assert_eq!(seg.canonical(), "{user-id}");
        let seg = Segment::new(SegmentType::SubscriptionId, "subscriptionId", "{SubscriptionID}");
        assert_eq!(seg.canonical(), "{subscriptionId}");
    }

    #[test]
    fn test_canonical_literal_keeps_raw() {
        let seg = Segment::new(SegmentType::ODataReference, "ref", "$ref");
        assert_eq!(seg.canonical(), "$ref");
    }

    #[test]
    fn test_placeholders_align_by_kind() {
        let a = Segment::new(SegmentType::UserValue, "id", "{id}");
        let b = Segment::new(SegmentType::UserValue, "user-id", "{user-id}");
        let label = Segment::new(SegmentType::Label, "users", "users");
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&label));
        assert!(!label.is_compatible(&a));
    }

    #[test]
    fn test_literals_compare_case_insensitively() {
        let a = Segment::new(SegmentType::Label, "users", "users");
        let b = Segment::new(SegmentType::Label, "Users", "Users");
        let c = Segment::new(SegmentType::Label, "groups", "groups");
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&c));
    }
}
