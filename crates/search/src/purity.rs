//! Protein purity classification.
//!
//! Each named protein source is reduced to a base animal, a physical form
//! and a mixed flag. The set of parses for a product is then rated on how
//! undiluted its main protein is.

use crate::lexicon::{Lexicon, ProteinVocabulary};
use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical form of a protein source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinForm {
    /// Whole muscle meat
    Pure,
    /// Rendered meal
    Meal,
    /// Rendered fat
    Fat,
    /// Organs, oils, broths, by-products
    Other,
}

/// One parsed protein source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinParse {
    /// Base ingredient with descriptors and form suffix removed
    pub base: String,
    /// Physical form
    pub form: ProteinForm,
    /// Base names a blend (`chicken_and_rice`)
    pub mixed: bool,
}

/// Purity rating tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurityTier {
    Pure,
    Meal,
    Fat,
    Mixed,
    None,
}

impl PurityTier {
    /// Lowercase tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurityTier::Pure => "pure",
            PurityTier::Meal => "meal",
            PurityTier::Fat => "fat",
            PurityTier::Mixed => "mixed",
            PurityTier::None => "none",
        }
    }
}

impl fmt::Display for PurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall purity of a product's protein sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinPurity {
    pub percent: u8,
    pub tier: PurityTier,
}

impl ProteinPurity {
    pub const PURE: Self = Self::new(100, PurityTier::Pure);
    pub const MEAL: Self = Self::new(93, PurityTier::Meal);
    pub const FAT: Self = Self::new(85, PurityTier::Fat);
    pub const MIXED: Self = Self::new(75, PurityTier::Mixed);
    pub const NONE: Self = Self::new(0, PurityTier::None);

    const fn new(percent: u8, tier: PurityTier) -> Self {
        Self { percent, tier }
    }
}

/// Strip `word_` from the front of `token`.
fn strip_word_prefix<'a>(token: &'a str, word: &str) -> Option<&'a str> {
    token.strip_prefix(word)?.strip_prefix('_')
}

/// Strip `_word` from the end of `token`.
fn strip_word_suffix<'a>(token: &'a str, word: &str) -> Option<&'a str> {
    token.strip_suffix(word)?.strip_suffix('_')
}

/// Parse one raw protein source name.
///
/// Returns `None` only when the name normalizes to nothing.
///
/// # Example
/// ```
/// use petfood_search::{parse_protein_source, Lexicon, ProteinForm};
///
/// let parsed = parse_protein_source("Freeze-Dried Raw Chicken Meal", Lexicon::builtin()).unwrap();
/// assert_eq!(parsed.base, "chicken");
/// assert_eq!(parsed.form, ProteinForm::Meal);
/// assert!(!parsed.mixed);
/// ```
pub fn parse_protein_source(raw: &str, lexicon: &Lexicon) -> Option<ProteinParse> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return None;
    }
    let vocab = &lexicon.protein;

    let mut base = strip_descriptors(&normalized, vocab);

    let mut form = ProteinForm::Pure;
    if let Some((stripped, suffix_form)) = vocab
        .suffixes
        .iter()
        .find_map(|rule| strip_word_suffix(base, &rule.suffix).map(|rest| (rest, rule.form)))
    {
        base = stripped;
        form = suffix_form;
    }

    if base.is_empty() {
        base = normalized.as_str();
        form = ProteinForm::Pure;
    }

    let mixed = vocab
        .mixed_infixes
        .iter()
        .any(|infix| base.contains(&format!("_{}_", infix)));

    Some(ProteinParse {
        base: base.to_string(),
        form,
        mixed,
    })
}

/// Strip stacked descriptor prefixes (`freeze_dried_raw_...`).
///
/// Every pass removes at least one prefix, so the loop ends after at most
/// one pass per underscore-delimited word.
fn strip_descriptors<'a>(token: &'a str, vocab: &ProteinVocabulary) -> &'a str {
    let mut rest = token;
    while let Some(stripped) = vocab
        .descriptor_prefixes
        .iter()
        .find_map(|prefix| strip_word_prefix(rest, prefix))
    {
        rest = stripped;
    }
    rest
}

/// Rate the purity of a product's protein sources.
///
/// Entries are grouped by base; the base with the most entries is primary,
/// ties going to the base seen first. Empty or all-blank input yields
/// [`ProteinPurity::NONE`].
pub fn evaluate_protein_purity<S: AsRef<str>>(sources: &[S], lexicon: &Lexicon) -> ProteinPurity {
    let parses: Vec<ProteinParse> = sources
        .iter()
        .filter_map(|source| parse_protein_source(source.as_ref(), lexicon))
        .collect();
    classify(&parses)
}

/// Apply the purity decision table to parsed sources.
pub fn classify(parses: &[ProteinParse]) -> ProteinPurity {
    // Bases in first-seen order with their entries.
    let mut groups: Vec<(&str, Vec<&ProteinParse>)> = Vec::new();
    for parse in parses {
        match groups.iter_mut().find(|(base, _)| *base == parse.base) {
            Some((_, entries)) => entries.push(parse),
            None => groups.push((parse.base.as_str(), vec![parse])),
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let Some((primary, others)) = groups.split_first() else {
        return ProteinPurity::NONE;
    };
    let primary_forms: Vec<ProteinForm> = primary.1.iter().map(|p| p.form).collect();
    let other_forms: Vec<ProteinForm> = others
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|p| p.form))
        .collect();

    let any_mixed = parses.iter().any(|p| p.mixed);
    let other_base_has_non_fat = other_forms.iter().any(|form| *form != ProteinForm::Fat);
    let has_other_base = !others.is_empty();
    let primary_has = |form: ProteinForm| primary_forms.contains(&form);

    if any_mixed || other_base_has_non_fat {
        return ProteinPurity::MIXED;
    }
    if !has_other_base && primary_forms.iter().all(|form| *form == ProteinForm::Pure) {
        return ProteinPurity::PURE;
    }
    if !has_other_base && !primary_has(ProteinForm::Fat) && !primary_has(ProteinForm::Other) {
        return ProteinPurity::MEAL;
    }
    if !has_other_base || other_forms.iter().all(|form| *form == ProteinForm::Fat) {
        return ProteinPurity::FAT;
    }
    ProteinPurity::MIXED
}
