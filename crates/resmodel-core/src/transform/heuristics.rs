//! Lookup tables that steer segment classification and naming.
//!
//! Everything here is immutable once built and handed by reference to each
//! stage, so tests can swap in their own tables.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::config::NamingConfig;

/// English number inflection used for resource and operation names.
pub trait Inflector: fmt::Debug + Send + Sync {
    fn singularize(&self, word: &str) -> String;

    fn pluralize(&self, word: &str) -> String;

    fn is_plural(&self, word: &str) -> bool {
        self.singularize(word) != word
    }
}

const DEFAULT_UNCOUNTABLE: &[&str] = &[
    "analytics",
    "data",
    "equipment",
    "information",
    "metadata",
    "news",
    "series",
    "species",
];

/// Singular and plural forms no suffix rule produces.
const DEFAULT_IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

const DEFAULT_VERBS: &[&str] = &[
    "accept", "acquire", "activate", "add", "approve", "archive", "assign", "batch", "cancel",
    "change", "check", "clear", "complete", "copy", "deactivate", "decline", "dismiss", "enable",
    "disable", "export", "forward", "import", "invite", "lock", "mark", "move", "pause", "publish",
    "reject", "renew", "reply", "reprocess", "reset", "restore", "resume", "retry", "revoke",
    "run", "send", "set", "snooze", "start", "stop", "subscribe", "sync", "translate",
    "unarchive", "unassign", "unlock", "unpublish", "unsubscribe", "upload", "validate",
];

const DEFAULT_STATIC_KEYWORDS: &[&str] = &["providers", "resourceGroups", "subscriptions"];

const DEFAULT_CAST_PREFIXES: &[&str] = &["microsoft.graph."];

const DEFAULT_ODATA_KEYWORDS: &[&str] = &["$ref"];

const DEFAULT_MODEL_NAMESPACES: &[&str] = &["microsoft.graph."];

/// Suffix-rule inflector with uncountable and irregular word lists.
#[derive(Debug, Clone)]
pub struct EnglishInflector {
    uncountable: BTreeSet<String>,
    /// Lowercase (singular, plural) pairs.
    irregular: Vec<(String, String)>,
}

impl Default for EnglishInflector {
    fn default() -> Self {
        Self::new(DEFAULT_UNCOUNTABLE.iter().copied()).with_irregular(DEFAULT_IRREGULAR.iter().copied())
    }
}

impl EnglishInflector {
    pub fn new<'a>(uncountable: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            uncountable: uncountable
                .into_iter()
                .map(|w| w.to_ascii_lowercase())
                .collect(),
            irregular: Vec::new(),
        }
    }

    /// Add (singular, plural) pairs; later pairs do not override earlier ones.
    pub fn with_irregular<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (singular, plural) in pairs {
            let singular = singular.to_ascii_lowercase();
            if singular.is_empty() || self.irregular.iter().any(|(s, _)| *s == singular) {
                continue;
            }
            self.irregular.push((singular, plural.to_ascii_lowercase()));
        }
        self
    }

    fn is_uncountable(&self, word: &str) -> bool {
        if self.uncountable.contains(&word.to_ascii_lowercase()) {
            return true;
        }
        // camelCase compounds are judged by their last word: `auditData`
        let (head, last) = split_last_word(word);
        !head.is_empty() && self.uncountable.contains(&last.to_ascii_lowercase())
    }

    /// `word` with its last word swapped for the other irregular form,
    /// keeping the case of that word's first letter: `directChildren` →
    /// `directChild`.
    fn swap_irregular(&self, word: &str, to_plural: bool) -> Option<String> {
        let (head, last) = split_last_word(word);
        let lower = last.to_ascii_lowercase();
        let replacement = self.irregular.iter().find_map(|(singular, plural)| {
            if to_plural && *singular == lower {
                Some(plural)
            } else if !to_plural && *plural == lower {
                Some(singular)
            } else {
                None
            }
        })?;

        let mut out = String::with_capacity(head.len() + replacement.len());
        out.push_str(head);
        let mut chars = replacement.chars();
        if let Some(first) = chars.next() {
            if last.starts_with(|c: char| c.is_ascii_uppercase()) {
                out.push(first.to_ascii_uppercase());
            } else {
                out.push(first);
            }
            out.push_str(chars.as_str());
        }
        Some(out)
    }
}

/// Split a camelCase word before its last capital: `directReports` →
/// (`direct`, `Reports`). Words without an inner capital have no head.
fn split_last_word(word: &str) -> (&str, &str) {
    match word.rfind(|c: char| c.is_ascii_uppercase()) {
        Some(i) if i > 0 => word.split_at(i),
        _ => ("", word),
    }
}

impl Inflector for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        if self.is_uncountable(word) {
            return word.to_string();
        }
        if let Some(singular) = self.swap_irregular(word, false) {
            return singular;
        }
        let lower = word.to_ascii_lowercase();
        let n = word.len();
        if lower.ends_with("ies") && n > 3 {
            format!("{}y", &word[..n - 3])
        } else if lower.ends_with("sses")
            || lower.ends_with("xes")
            || lower.ends_with("zes")
            || lower.ends_with("ches")
            || lower.ends_with("shes")
        {
            word[..n - 2].to_string()
        } else if lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
            && !lower.ends_with("is")
            && n > 1
        {
            word[..n - 1].to_string()
        } else {
            word.to_string()
        }
    }

    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() || self.is_uncountable(word) {
            return word.to_string();
        }
        if let Some(plural) = self.swap_irregular(word, true) {
            return plural;
        }
        let lower = word.to_ascii_lowercase();
        let n = word.len();
        let consonant_y = lower.ends_with('y')
            && n > 1
            && !matches!(lower.as_bytes()[n - 2], b'a' | b'e' | b'i' | b'o' | b'u');
        if consonant_y {
            format!("{}ies", &word[..n - 1])
        } else if lower.ends_with('s')
            || lower.ends_with('x')
            || lower.ends_with('z')
            || lower.ends_with("ch")
            || lower.ends_with("sh")
        {
            format!("{word}es")
        } else {
            format!("{word}s")
        }
    }
}

/// Recognised English action verbs. A name "is" a verb when its first word is
/// in the set, so `AssignLicense` matches `assign` but `Assignment` does not.
#[derive(Debug, Clone, Default)]
pub struct VerbSet {
    verbs: BTreeSet<String>,
}

impl VerbSet {
    pub fn new<S: AsRef<str>>(verbs: impl IntoIterator<Item = S>) -> Self {
        Self {
            verbs: verbs
                .into_iter()
                .map(|v| v.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.contains(&verb.to_ascii_lowercase())
    }

    /// The leading verb of `name`, if its first word is a known verb.
    pub fn matches<'n>(&self, name: &'n str) -> Option<&'n str> {
        let word = first_word(name);
        if !word.is_empty() && self.contains(word) {
            Some(word)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

/// The first word of a PascalCase, camelCase, snake or kebab name.
fn first_word(name: &str) -> &str {
    let end = name
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_uppercase() || *c == '_' || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    &name[..end]
}

/// The full set of tables used by one import run.
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub inflector: Arc<dyn Inflector>,
    pub verbs: VerbSet,
    /// Literals that never denote a collection, lowercase.
    pub static_keywords: BTreeSet<String>,
    /// Namespace prefixes marking a cast segment, lowercase.
    pub cast_prefixes: Vec<String>,
    /// OData reference keywords such as `$ref`, lowercase.
    pub odata_keywords: BTreeSet<String>,
    /// Prefixes stripped from schema titles to form model names, lowercase.
    pub model_namespaces: Vec<String>,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::from_config(&NamingConfig::default())
    }
}

impl Heuristics {
    /// Built-in tables extended with the entries from `naming`.
    pub fn from_config(naming: &NamingConfig) -> Self {
        let uncountable = DEFAULT_UNCOUNTABLE
            .iter()
            .copied()
            .chain(naming.uncountable.iter().map(String::as_str));
        let irregular = DEFAULT_IRREGULAR.iter().copied().chain(
            naming
                .irregular
                .iter()
                .map(|(singular, plural)| (singular.as_str(), plural.as_str())),
        );
        Self {
            inflector: Arc::new(EnglishInflector::new(uncountable).with_irregular(irregular)),
            verbs: VerbSet::new(
                DEFAULT_VERBS
                    .iter()
                    .copied()
                    .chain(naming.verbs.iter().map(String::as_str)),
            ),
            static_keywords: lowercase_set(DEFAULT_STATIC_KEYWORDS, &naming.static_keywords),
            cast_prefixes: lowercase_list(DEFAULT_CAST_PREFIXES, &naming.cast_prefixes),
            odata_keywords: lowercase_set(DEFAULT_ODATA_KEYWORDS, &naming.odata_keywords),
            model_namespaces: lowercase_list(DEFAULT_MODEL_NAMESPACES, &naming.model_namespaces),
        }
    }

    pub fn with_inflector(mut self, inflector: Arc<dyn Inflector>) -> Self {
        self.inflector = inflector;
        self
    }

    pub fn singularize(&self, word: &str) -> String {
        self.inflector.singularize(word)
    }

    pub fn pluralize(&self, word: &str) -> String {
        self.inflector.pluralize(word)
    }

    pub fn is_plural(&self, word: &str) -> bool {
        self.inflector.is_plural(word)
    }

    pub fn is_static_keyword(&self, raw: &str) -> bool {
        self.static_keywords.contains(&raw.to_ascii_lowercase())
    }

    pub fn is_odata_keyword(&self, raw: &str) -> bool {
        self.odata_keywords.contains(&raw.to_ascii_lowercase())
    }

    /// The text after a cast namespace prefix, if `raw` carries one.
    pub fn strip_cast_prefix<'r>(&self, raw: &'r str) -> Option<&'r str> {
        strip_any_prefix(raw, &self.cast_prefixes)
    }

    /// `raw` without a leading model namespace.
    pub fn strip_model_namespace<'r>(&self, raw: &'r str) -> &'r str {
        strip_any_prefix(raw, &self.model_namespaces).unwrap_or(raw)
    }
}

fn strip_any_prefix<'r>(raw: &'r str, prefixes: &[String]) -> Option<&'r str> {
    prefixes.iter().find_map(|p| {
        let head = raw.get(..p.len())?;
        if head.eq_ignore_ascii_case(p) {
            raw.get(p.len()..)
        } else {
            None
        }
    })
}

fn lowercase_set(defaults: &[&str], extra: &[String]) -> BTreeSet<String> {
    defaults
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .map(str::to_ascii_lowercase)
        .collect()
}

fn lowercase_list(defaults: &[&str], extra: &[String]) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();
    for item in defaults.iter().copied().chain(extra.iter().map(String::as_str)) {
        let lower = item.to_ascii_lowercase();
        if !list.contains(&lower) {
            list.push(lower);
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize() {
        let inflector = EnglishInflector::default();
        assert_eq!(inflector.singularize("users"), "user");
        assert_eq!(inflector.singularize("messages"), "message");
        assert_eq!(inflector.singularize("policies"), "policy");
        assert_eq!(inflector.singularize("addresses"), "address");
        assert_eq!(inflector.singularize("mailboxes"), "mailbox");
        assert_eq!(inflector.singularize("directReports"), "directReport");
        assert_eq!(inflector.singularize("status"), "status");
        assert_eq!(inflector.singularize("analysis"), "analysis");
        assert_eq!(inflector.singularize("manager"), "manager");
    }

    #[test]
    fn test_pluralize() {
        let inflector = EnglishInflector::default();
        assert_eq!(inflector.pluralize("User"), "Users");
        assert_eq!(inflector.pluralize("Policy"), "Policies");
        assert_eq!(inflector.pluralize("Day"), "Days");
        assert_eq!(inflector.pluralize("Address"), "Addresses");
        assert_eq!(inflector.pluralize("Match"), "Matches");
        assert_eq!(inflector.pluralize(""), "");
    }

    #[test]
    fn test_uncountable_compound() {
        let inflector = EnglishInflector::default();
        assert_eq!(inflector.singularize("metadata"), "metadata");
        assert_eq!(inflector.pluralize("auditData"), "auditData");
        assert!(!inflector.is_plural("news"));
        assert!(inflector.is_plural("settings"));
    }

    #[test]
    fn test_irregular_plurals() {
        let inflector = EnglishInflector::default();
        assert_eq!(inflector.singularize("children"), "child");
        assert_eq!(inflector.singularize("People"), "Person");
        assert_eq!(inflector.singularize("directChildren"), "directChild");
        assert_eq!(inflector.pluralize("Child"), "Children");
        assert_eq!(inflector.pluralize("person"), "people");
        assert!(inflector.is_plural("children"));
        assert!(!inflector.is_plural("child"));
        // Whole words only.
        assert_eq!(inflector.singularize("specimen"), "specimen");
    }

    #[test]
    fn test_verb_matches_first_word_only() {
        let verbs = VerbSet::new(["assign", "revoke"]);
        assert_eq!(verbs.matches("AssignLicense"), Some("Assign"));
        assert_eq!(verbs.matches("revokeSignInSessions"), Some("revoke"));
        assert_eq!(verbs.matches("Assignment"), None);
        assert_eq!(verbs.matches(""), None);
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("AssignLicense"), "Assign");
        assert_eq!(first_word("send_mail"), "send");
        assert_eq!(first_word("User"), "User");
    }

    #[test]
    fn test_from_config_extends_defaults() {
        let naming = NamingConfig {
            verbs: vec!["Escalate".to_string()],
            static_keywords: vec!["tenants".to_string()],
            irregular: [("cactus".to_string(), "cacti".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let heuristics = Heuristics::from_config(&naming);
        assert!(heuristics.is_plural("cacti"));
        assert_eq!(heuristics.singularize("cacti"), "cactus");
        assert_eq!(heuristics.singularize("children"), "child");
        assert!(!Heuristics::default().is_plural("cacti"));
        assert!(heuristics.verbs.contains("escalate"));
        assert!(heuristics.verbs.contains("assign"));
        assert!(heuristics.is_static_keyword("Tenants"));
        assert!(heuristics.is_static_keyword("resourcegroups"));
    }

    #[test]
    fn test_strip_prefixes() {
        let heuristics = Heuristics::default();
        assert_eq!(
            heuristics.strip_cast_prefix("Microsoft.Graph.user"),
            Some("user")
        );
        assert_eq!(heuristics.strip_cast_prefix("users"), None);
        assert_eq!(
            heuristics.strip_model_namespace("microsoft.graph.message"),
            "message"
        );
        assert_eq!(heuristics.strip_model_namespace("message"), "message");
    }

    #[derive(Debug)]
    struct Invariant;

    impl Inflector for Invariant {
        fn singularize(&self, word: &str) -> String {
            word.to_string()
        }

        fn pluralize(&self, word: &str) -> String {
            word.to_string()
        }
    }

    #[test]
    fn test_inflector_is_swappable() {
        let heuristics = Heuristics::default().with_inflector(Arc::new(Invariant));
        assert_eq!(heuristics.pluralize("User"), "User");
        assert!(!heuristics.is_plural("users"));
    }
}
