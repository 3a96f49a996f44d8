use heck::{ToPascalCase, ToSnakeCase};

use super::heuristics::Heuristics;

/// PascalCase identifier for a service, label or literal segment.
///
/// - `users` → `Users`
/// - `directReports` → `DirectReports`
/// - `security-alerts` → `SecurityAlerts`
pub fn clean_name(name: &str) -> String {
    sanitize_identifier(name).to_pascal_case()
}

/// snake_case form used when comparing identifiers of different styles,
/// e.g. a `{user-id}` placeholder against a `userId` field.
pub fn comparable_name(name: &str) -> String {
    sanitize_identifier(name).to_snake_case()
}

/// Model name carried by a schema title: the title with a known model
/// namespace removed. Case is preserved so the result lines up with the
/// names registered in [`super::models::Models`].
pub fn clean_model_name(title: &str, heuristics: &Heuristics) -> String {
    heuristics.strip_model_namespace(title.trim()).to_string()
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
