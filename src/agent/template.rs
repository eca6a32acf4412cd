//! `{{key}}` substitution of Bag values into agent instructions.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::state::Bag;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_.\-]*)\s*\}\}")
        .expect("placeholder regex must compile")
});

/// Render `template` against the Bag.
///
/// Both `{{key}}` and `{{.key}}` resolve to the value's text form. Keys
/// missing from the Bag are left as written.
pub fn render(template: &str, bag: &Bag) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match bag.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
