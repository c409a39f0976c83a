//! Text normalization and plural morphology.
//!
//! Every string the engine compares passes through [`normalize`] first, so
//! the whole pipeline works over one alphabet: lowercase ASCII letters,
//! digits and single interior underscores.

use std::collections::BTreeSet;

/// Canonicalize arbitrary text into a token.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single underscore and strips leading/trailing underscores. Empty or
/// all-punctuation input yields the empty string, which callers treat as
/// absent.
///
/// # Example
/// ```
/// use petfood_search::normalize;
///
/// assert_eq!(normalize("  Deboned Chicken (Fresh) "), "deboned_chicken_fresh");
/// assert_eq!(normalize("--"), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }

    out
}

/// Plural suffix rules, tested independently of each other.
const PLURAL_RULES: &[(&str, &str)] = &[("ies", "y"), ("oes", ""), ("es", ""), ("s", "")];

/// Derive singular variants of a token.
///
/// The result always contains the token itself. Each suffix rule that matches
/// contributes its transformed form, so `potatoes` yields `potatoes`,
/// `potat`, `potato` and `potatoe`. Transforms that would leave nothing are
/// dropped.
pub fn plural_variants(token: &str) -> BTreeSet<String> {
    let mut variants = BTreeSet::new();
    if token.is_empty() {
        return variants;
    }
    variants.insert(token.to_string());

    for (suffix, replacement) in PLURAL_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            let variant = format!("{}{}", stem.trim_end_matches('_'), replacement);
            if !variant.is_empty() {
                variants.insert(variant);
            }
        }
    }

    variants
}

/// The part of a token before its first underscore.
#[inline]
pub(crate) fn root(token: &str) -> &str {
    token.split('_').next().unwrap_or(token)
}
