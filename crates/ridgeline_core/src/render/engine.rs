//! Placeholder extraction and substitution over template content.
//!
//! # Responsibility
//! - Own the `{{ name }}` placeholder syntax used by stored templates.
//! - Substitute supplied values without touching unknown placeholders.
//!
//! # Invariants
//! - A placeholder is `{{`, optional whitespace, a name (any run of
//!   characters other than `}`), optional whitespace, `}}`. The syntax is
//!   bit-exact for round-trip compatibility with stored content.
//! - Substitution is a single left-to-right pass: placeholder text inside a
//!   substituted value is emitted verbatim, never expanded.
//! - Rendering never fails on content shape; the worst case is a literal
//!   placeholder surviving into the output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid placeholder regex"));

/// Values supplied for rendering, keyed by placeholder name.
///
/// A key mapped to `None` renders as an empty string; this mirrors callers
/// that deserialize JSON bodies where a variable may be present but null.
pub type VariableValues = HashMap<String, Option<String>>;

/// Returns the distinct placeholder names appearing in `content`.
///
/// Names are trimmed of surrounding whitespace; repeated placeholders
/// collapse to one entry. Order follows the set's natural sort, not
/// first occurrence.
pub fn extract_variables(content: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Substitutes supplied values into `content` in a single pass.
///
/// Every occurrence of a supplied name is replaced (exact, case-sensitive
/// name match after whitespace trimming). Placeholders whose name is not in
/// `values` are left untouched; that is a deliberate pass-through for
/// partially-filled documents, not an error.
pub fn render(content: &str, values: &VariableValues) -> String {
    PLACEHOLDER_RE
        .replace_all(content, |caps: &Captures<'_>| {
            let name = caps[1].trim();
            match values.get(name) {
                Some(value) => value.clone().unwrap_or_default(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
