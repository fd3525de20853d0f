use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

fn leftover() -> &'static Regex {
    static LEFTOVER: OnceLock<Regex> = OnceLock::new();
    LEFTOVER.get_or_init(|| Regex::new(r"\{\{[^}]+\}\}").expect("leftover pattern is valid"))
}

/// Render `{{ key }}` placeholders from `vars`.
///
/// Keys outside `allowed` (when given), missing keys and `null` values render as
/// empty strings. Any other `{{...}}` sequence is stripped, and the result is
/// trimmed.
pub fn render_template(template: &str, vars: &Map<String, Value>, allowed: Option<&[&str]>) -> String {
    let rendered = placeholder().replace_all(template, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        if allowed.is_some_and(|keys| !keys.contains(&key)) {
            return String::new();
        }
        match vars.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    });
    leftover().replace_all(&rendered, "").trim().to_string()
}
