use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// Anything other than lowercase ASCII letters, commas and spaces is dropped.
// Digits and hyphens go too, so names like "1,4-dioxane" come out mangled.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z, ]").expect("valid regex"));

/// Turn raw label text into an ordered list of ingredient names.
///
/// Never fails: empty or garbage input yields an empty list.
pub fn normalize(raw_text: &str) -> Vec<String> {
    strip_disallowed(raw_text)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lower-case `text` and remove every character a normalized name cannot hold.
pub fn strip_disallowed(text: &str) -> String {
    DISALLOWED.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn dedup_preserving_order(ingredients: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ingredients
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
