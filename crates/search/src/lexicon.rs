//! Domain vocabulary driving query expansion and classification.
//!
//! A [`Lexicon`] is plain configuration data: the synonym table, the
//! multi-word phrase overrides, the grain reference sets and the protein
//! descriptor vocabulary. New domain terms are added here (or in a TOML
//! file), never in the matching code.
//!
//! # Example
//! ```
//! use petfood_search::Lexicon;
//!
//! let lexicon = Lexicon::from_toml_str(r#"
//! [synonyms]
//! bb = ["blue_buffalo"]
//! "#).unwrap();
//!
//! assert!(lexicon.expand_synonyms("bb").contains("blue_buffalo"));
//! // Sections that were not given keep their defaults.
//! assert!(lexicon.is_phrase_override("grain_free"));
//! ```

use crate::error::{Result, SearchError};
use crate::normalize::{normalize, plural_variants};
use crate::purity::ProteinForm;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

static BUILTIN: Lazy<Lexicon> = Lazy::new(Lexicon::default);

/// Grain status a query group asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrainDirection {
    /// Product must contain grain
    With,
    /// Product must be grain free
    Without,
}

/// Complete matching vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Canonical token -> additional tokens it expands to
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Multi-word phrases consumed as a single query term
    pub phrases: PhraseConfig,
    /// Grain status vocabulary
    pub grain: GrainVocabulary,
    /// Protein source parsing vocabulary
    pub protein: ProteinVocabulary,
}

/// Two-word phrases that override unigram parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseConfig {
    /// Phrase tokens such as `grain_free`
    pub overrides: BTreeSet<String>,
}

/// Grain status token sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainVocabulary {
    /// Query tokens that demand a grain-containing product
    pub present: BTreeSet<String>,
    /// Query tokens that demand a grain-free product
    pub free: BTreeSet<String>,
    /// Tokens indexed for products with `contains_grain = true`
    pub status_present: BTreeSet<String>,
    /// Tokens indexed for products with `contains_grain = false`
    pub status_free: BTreeSet<String>,
    /// Exclude tokens that may only match `status_present`
    pub exclusion_guard: BTreeSet<String>,
}

/// Vocabulary used to parse protein source names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProteinVocabulary {
    /// Descriptor words stripped from the front, in order (`deboned`, `raw`, ...)
    pub descriptor_prefixes: Vec<String>,
    /// Infix words that mark a blended source (`and`, `with`, `plus`)
    pub mixed_infixes: Vec<String>,
    /// Ordered suffix rules; the first match assigns the form
    pub suffixes: Vec<FormSuffix>,
}

/// A trailing word that marks the physical form of a protein source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSuffix {
    /// Suffix word(s), e.g. `meal` or `by_product_meal`
    pub suffix: String,
    /// Form assigned when the suffix matches
    pub form: ProteinForm,
}

impl Lexicon {
    /// Shared built-in vocabulary.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Parse a lexicon from TOML. Missing sections keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let lexicon: Lexicon = toml::from_str(source)?;
        let lexicon = lexicon.normalized();
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Load a lexicon from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading lexicon");
        let source = std::fs::read_to_string(path)?;
        let lexicon = Self::from_toml_str(&source)?;
        tracing::debug!(
            synonyms = lexicon.synonyms.len(),
            phrases = lexicon.phrases.overrides.len(),
            "Lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Render the lexicon as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check structural rules that parsing alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.grain.present.is_empty() || self.grain.free.is_empty() {
            return Err(SearchError::InvalidLexicon(
                "grain.present and grain.free must both be non-empty".to_string(),
            ));
        }

        let overlap: Vec<&str> = self
            .grain
            .present
            .intersection(&self.grain.free)
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            return Err(SearchError::InvalidLexicon(format!(
                "grain.present and grain.free overlap: {}",
                overlap.join(", ")
            )));
        }

        if !self.grain.exclusion_guard.is_empty() && self.grain.status_present.is_empty() {
            return Err(SearchError::InvalidLexicon(
                "grain.exclusion_guard requires grain.status_present".to_string(),
            ));
        }

        Ok(())
    }

    /// Normalize every key and value, dropping entries that normalize to nothing.
    pub fn normalized(self) -> Self {
        let synonyms = self
            .synonyms
            .into_iter()
            .filter_map(|(key, values)| {
                let key = normalize(&key);
                if key.is_empty() {
                    return None;
                }
                Some((key, normalize_list(values)))
            })
            .collect();

        Self {
            synonyms,
            phrases: PhraseConfig {
                overrides: normalize_set(self.phrases.overrides),
            },
            grain: GrainVocabulary {
                present: normalize_set(self.grain.present),
                free: normalize_set(self.grain.free),
                status_present: normalize_set(self.grain.status_present),
                status_free: normalize_set(self.grain.status_free),
                exclusion_guard: normalize_set(self.grain.exclusion_guard),
            },
            protein: ProteinVocabulary {
                descriptor_prefixes: normalize_list(self.protein.descriptor_prefixes),
                mixed_infixes: normalize_list(self.protein.mixed_infixes),
                suffixes: self
                    .protein
                    .suffixes
                    .into_iter()
                    .filter_map(|rule| {
                        let suffix = normalize(&rule.suffix);
                        (!suffix.is_empty()).then_some(FormSuffix { suffix, form: rule.form })
                    })
                    .collect(),
            },
        }
    }

    /// Expand a token to itself, its synonyms and its plural variants.
    pub fn expand_synonyms(&self, token: &str) -> BTreeSet<String> {
        if token.is_empty() {
            return BTreeSet::new();
        }

        let mut expanded = plural_variants(token);
        if let Some(extra) = self.synonyms.get(token) {
            expanded.extend(extra.iter().cloned());
        }
        expanded
    }

    /// True if `token` is a recognized multi-word phrase.
    #[inline]
    pub fn is_phrase_override(&self, token: &str) -> bool {
        self.phrases.overrides.contains(token)
    }

    /// Direction demanded by a group of query tokens, if any.
    ///
    /// Grain-present wins when a group somehow touches both sets.
    pub fn grain_direction<'a, I>(&self, tokens: I) -> Option<GrainDirection>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut direction = None;
        for token in tokens {
            if self.grain.present.contains(token) {
                return Some(GrainDirection::With);
            }
            if self.grain.free.contains(token) {
                direction = Some(GrainDirection::Without);
            }
        }
        direction
    }

    /// Reference set for a direction.
    pub fn grain_reference(&self, direction: GrainDirection) -> &BTreeSet<String> {
        match direction {
            GrainDirection::With => &self.grain.present,
            GrainDirection::Without => &self.grain.free,
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        const FREE_ALIASES: &[&str] = &["grain_free", "no_grain", "grainfree"];
        const PRESENT_ALIASES: &[&str] = &["with_grain", "contains_grain", "grain"];

        let mut synonyms = BTreeMap::new();
        for (key, values) in [
            ("grain_free", &["no_grain", "grainfree"][..]),
            ("no_grain", &["grain_free", "grainfree"][..]),
            ("grainfree", &["grain_free", "no_grain"][..]),
            ("no_grains", FREE_ALIASES),
            ("grains_free", FREE_ALIASES),
            ("without_grain", FREE_ALIASES),
            ("without_grains", FREE_ALIASES),
            ("with_grain", &["contains_grain", "grain"][..]),
            ("contains_grain", &["with_grain", "grain"][..]),
            ("grain", &["with_grain", "contains_grain"][..]),
            ("grains", PRESENT_ALIASES),
            ("with_grains", PRESENT_ALIASES),
            ("contains_grains", PRESENT_ALIASES),
            ("has_grain", PRESENT_ALIASES),
            ("has_grains", PRESENT_ALIASES),
            ("protein", &["has_protein"][..]),
            ("totw", &["taste_of_the_wild"][..]),
        ] {
            synonyms.insert(key.to_string(), strings(values));
        }

        Self {
            synonyms,
            phrases: PhraseConfig::default(),
            grain: GrainVocabulary::default(),
            protein: ProteinVocabulary::default(),
        }
    }
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            overrides: string_set(&[
                "grain_free",
                "grains_free",
                "no_grain",
                "no_grains",
                "without_grain",
                "without_grains",
                "with_grain",
                "with_grains",
                "contains_grain",
                "contains_grains",
                "has_grain",
                "has_grains",
            ]),
        }
    }
}

impl Default for GrainVocabulary {
    fn default() -> Self {
        Self {
            present: string_set(&[
                "grain",
                "grains",
                "with_grain",
                "with_grains",
                "contains_grain",
                "contains_grains",
                "has_grain",
                "has_grains",
            ]),
            free: string_set(&[
                "grain_free",
                "grains_free",
                "grainfree",
                "no_grain",
                "no_grains",
                "without_grain",
                "without_grains",
            ]),
            status_present: string_set(&["contains_grain", "grain", "grains", "with_grains"]),
            status_free: string_set(&["grain_free", "no_grain", "no_grains", "grainfree"]),
            exclusion_guard: string_set(&["grain", "grains"]),
        }
    }
}

impl Default for ProteinVocabulary {
    fn default() -> Self {
        let suffixes = [
            ("by_product_meal", ProteinForm::Other),
            ("by_products", ProteinForm::Other),
            ("meal", ProteinForm::Meal),
            ("fat", ProteinForm::Fat),
            ("oil", ProteinForm::Other),
            ("broth", ProteinForm::Other),
            ("liver", ProteinForm::Other),
            ("heart", ProteinForm::Other),
            ("digest", ProteinForm::Other),
            ("cartilage", ProteinForm::Other),
            ("plasma", ProteinForm::Other),
        ]
        .into_iter()
        .map(|(suffix, form)| FormSuffix { suffix: suffix.to_string(), form })
        .collect();

        Self {
            descriptor_prefixes: strings(&[
                "deboned",
                "boneless",
                "roasted",
                "freeze_dried",
                "dehydrated",
                "real",
                "fresh",
                "raw",
                "ground",
                "dried",
                "whole",
                "organic",
                "wild_caught",
                "cage_free",
                "free_range",
                "grass_fed",
                "pasture_raised",
            ]),
            mixed_infixes: strings(&["and", "with", "plus"]),
            suffixes,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|item| normalize(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn normalize_set(items: BTreeSet<String>) -> BTreeSet<String> {
    items
        .iter()
        .map(|item| normalize(item))
        .filter(|item| !item.is_empty())
        .collect()
}
