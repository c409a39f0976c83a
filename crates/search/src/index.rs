//! Per-product token derivation and membership tests.
//!
//! Each product yields two views: an unordered [`TokenSet`] answering
//! "does it mention X" and an ordered ingredient sequence answering "how
//! prominently". A third, flat list keeps repeated mentions for frequency
//! tie-breaks.

use crate::lexicon::Lexicon;
use crate::normalize::{normalize, root};
use crate::product::ProductRecord;
use std::collections::HashSet;

/// Membership-only set of product tokens.
pub type TokenSet = HashSet<String>;

const HAS_PROTEIN: &[&str] = &["has_protein", "protein"];
const NO_PROTEIN: &str = "no_protein";

/// Tokens derived from one product for one scoring pass.
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    /// Unordered tokens used for yes/no matching
    pub tokens: TokenSet,
    /// Ingredient slugs followed by protein source slugs, in label order
    pub ordered_ingredients: Vec<String>,
    /// Ingredient and protein slugs plus their roots, repeats kept
    pub ingredient_mentions: Vec<String>,
    /// Status tokens derived from `contains_grain` alone
    pub grain_status: TokenSet,
}

impl ProductIndex {
    /// Build every view of a product.
    pub fn build(product: &ProductRecord, lexicon: &Lexicon) -> Self {
        Self {
            tokens: token_set(product, lexicon),
            ordered_ingredients: ordered_ingredients(product),
            ingredient_mentions: ingredient_mentions(product),
            grain_status: grain_status_tokens(product, lexicon),
        }
    }

    /// Number of raw mentions of `token` across ingredients and protein sources.
    pub fn mention_count(&self, token: &str) -> usize {
        self.ingredient_mentions.iter().filter(|m| *m == token).count()
    }
}

/// Split identity text (id, name, brand) into normalized words.
fn identity_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | '_'))
        .map(normalize)
        .filter(|word| !word.is_empty())
}

/// Non-empty slugs of the `;`-delimited ingredient list followed by protein sources.
fn labelled_slugs(product: &ProductRecord) -> impl Iterator<Item = String> + '_ {
    product
        .ingredients_list
        .split(';')
        .chain(product.protein_sources.iter().map(String::as_str))
        .map(normalize)
        .filter(|slug| !slug.is_empty())
}

/// Derive the unordered token set for a product.
///
/// Identity fields contribute their words plus the full slug of name and
/// brand (so multi-word brand aliases can match). Every ingredient and
/// protein source contributes its slug and its root. Grain and protein
/// status tokens are added from the record's flags.
pub fn token_set(product: &ProductRecord, lexicon: &Lexicon) -> TokenSet {
    let mut tokens = TokenSet::new();

    for field in [&product.id, &product.name, &product.brand] {
        tokens.extend(identity_words(field));
    }
    for field in [&product.name, &product.brand] {
        let slug = normalize(field);
        if !slug.is_empty() {
            tokens.insert(slug);
        }
    }

    for slug in labelled_slugs(product) {
        tokens.insert(root(&slug).to_string());
        tokens.insert(slug);
    }

    tokens.extend(grain_status_tokens(product, lexicon));

    if product.protein_sources.is_empty() {
        tokens.insert(NO_PROTEIN.to_string());
    } else {
        tokens.extend(HAS_PROTEIN.iter().map(|t| t.to_string()));
    }

    tokens
}

/// Grain status tokens for the record's `contains_grain` flag.
///
/// Kept apart from identity words so a grain-free product named
/// "Grain Free ..." never looks grain-inclusive.
pub fn grain_status_tokens(product: &ProductRecord, lexicon: &Lexicon) -> TokenSet {
    match product.contains_grain {
        Some(true) => lexicon.grain.status_present.iter().cloned().collect(),
        Some(false) => lexicon.grain.status_free.iter().cloned().collect(),
        None => TokenSet::new(),
    }
}

/// Derive the ordered ingredient sequence for a product.
///
/// The ingredient list is split on `;`, `,` and newlines, then protein
/// sources are appended. Full slugs only, duplicates kept.
pub fn ordered_ingredients(product: &ProductRecord) -> Vec<String> {
    product
        .ingredients_list
        .split([';', ',', '\n'])
        .chain(product.protein_sources.iter().map(String::as_str))
        .map(normalize)
        .filter(|slug| !slug.is_empty())
        .collect()
}

/// Flat ingredient/protein token list with repeats, used for frequency counts.
pub fn ingredient_mentions(product: &ProductRecord) -> Vec<String> {
    let mut mentions = Vec::new();
    for slug in labelled_slugs(product) {
        let root = root(&slug);
        if root != slug {
            mentions.push(root.to_string());
        }
        mentions.push(slug);
    }
    mentions
}

/// Permissive membership used for include groups.
///
/// True on exact membership or when any member starts with `token`, which
/// also covers `token_` compound prefixes.
pub fn has_token(set: &TokenSet, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    set.contains(token) || set.iter().any(|member| member.starts_with(token))
}

/// Strict membership used for excludes.
///
/// Guarded grain words only match the grain-present status tokens of the
/// record's flag, so excluding "grain" never hides a grain-free product.
/// Anything else matches exactly or as an underscore-delimited prefix.
pub fn has_token_exclude(index: &ProductIndex, token: &str, lexicon: &Lexicon) -> bool {
    let token = normalize(token);
    if token.is_empty() {
        return false;
    }

    if lexicon.grain.exclusion_guard.contains(&token) {
        return lexicon
            .grain
            .status_present
            .iter()
            .any(|status| index.grain_status.contains(status));
    }

    if index.tokens.contains(&token) {
        return true;
    }
    let compound = format!("{}_", token);
    index
        .tokens
        .iter().any(|member| member.starts_with(&compound))
}
