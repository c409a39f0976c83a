//! Query parsing.
//!
//! A query is a whitespace-separated list of terms. Each include term
//! becomes one OR-group of token variants; groups are ANDed together. A
//! leading `-` turns a term into an exclude, and two adjacent terms can fuse
//! into a configured phrase such as "grain free".

use crate::lexicon::Lexicon;
use crate::normalize::{normalize, plural_variants};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// OR-set of token variants generated from one typed term.
pub type QueryGroup = BTreeSet<String>;

/// Labels of the parsed filters, for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLabels {
    /// Normalized include terms, phrases kept whole (`grain_free`)
    pub includes: BTreeSet<String>,
    /// Normalized exclude terms, without the `-` prefix
    pub excludes: BTreeSet<String>,
}

/// A parsed query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Include groups in the order they were typed
    pub include_groups: Vec<QueryGroup>,
    /// Tokens that veto a product
    pub excludes: BTreeSet<String>,
    /// Normalized term or phrase labels of the include groups
    pub label_includes: BTreeSet<String>,
    /// Normalized term or phrase labels of the excludes
    pub label_excludes: BTreeSet<String>,
}

impl ParsedQuery {
    /// True when the query has neither include groups nor excludes.
    pub fn is_empty(&self) -> bool {
        self.include_groups.is_empty() && self.excludes.is_empty()
    }

    /// Display labels.
    pub fn labels(&self) -> QueryLabels {
        QueryLabels {
            includes: self.label_includes.clone(),
            excludes: self.label_excludes.clone(),
        }
    }
}

/// Parse a raw query string.
///
/// # Example
/// ```
/// use petfood_search::{parse_query, Lexicon};
///
/// let query = parse_query("grain free chicken -beef", Lexicon::builtin());
/// assert_eq!(query.include_groups.len(), 2);
/// assert!(query.include_groups[0].contains("no_grain"));
/// assert!(query.excludes.contains("beef"));
/// assert!(query.label_includes.contains("grain_free"));
/// ```
pub fn parse_query(query: &str, lexicon: &Lexicon) -> ParsedQuery {
    let terms: Vec<&str> = query.split_whitespace().collect();
    let mut parsed = ParsedQuery::default();
    let mut cursor = 0;

    while cursor < terms.len() {
        let term = terms[cursor];
        let (is_exclude, raw_base) = match term.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, term),
        };

        let base = normalize(raw_base);
        if base.is_empty() {
            cursor += 1;
            continue;
        }

        let phrase = terms
            .get(cursor + 1)
            .filter(|next| !next.starts_with('-'))
            .map(|next| normalize(next))
            .filter(|next| !next.is_empty())
            .map(|next| format!("{}_{}", base, next));

        let (group, label) = match phrase {
            Some(phrase) if lexicon.is_phrase_override(&phrase) => {
                cursor += 2;
                (lexicon.expand_synonyms(&phrase), phrase)
            }
            phrase => {
                cursor += 1;
                let mut group = lexicon.expand_synonyms(&base);
                if let Some(phrase) = phrase {
                    group.extend(plural_variants(&phrase));
                }
                (group, base)
            }
        };

        if is_exclude {
            parsed.excludes.extend(group);
            parsed.label_excludes.insert(label);
        } else {
            parsed.include_groups.push(group);
            parsed.label_includes.insert(label);
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ParsedQuery {
        parse_query(query, Lexicon::builtin())
    }

    #[test]
    fn test_empty_query_is_identity() {
        assert!(parse("").is_empty());
        assert!(parse("   \t ").is_empty());
        assert!(parse("- !! --").is_empty());
    }

    #[test]
    fn test_single_term() {
        let query = parse("Chicken");
        assert_eq!(query.include_groups, vec![QueryGroup::from(["chicken".to_string()])]);
        assert_eq!(query.label_includes, BTreeSet::from(["chicken".to_string()]));
    }

    #[test]
    fn test_phrase_override_consumes_both_terms() {
        let query = parse("grain free");
        assert_eq!(query.include_groups.len(), 1);
        let group = &query.include_groups[0];
        assert!(group.contains("grain_free"));
        assert!(group.contains("grainfree"));
        assert!(!group.contains("grain"));
        assert!(!group.contains("free"));
        assert_eq!(query.label_includes, BTreeSet::from(["grain_free".to_string()]));
    }

    #[test]
    fn test_bigram_candidate_does_not_consume() {
        let query = parse("sweet potatoes");
        assert_eq!(query.include_groups.len(), 2);
        assert!(query.include_groups[0].contains("sweet"));
        assert!(query.include_groups[0].contains("sweet_potatoes"));
        assert!(query.include_groups[0].contains("sweet_potato"));
        assert!(query.include_groups[1].contains("potato"));
        assert!(!query.include_groups[1].contains("sweet_potato"));
    }

    #[test]
    fn test_exclude_terms() {
        let query = parse("chicken -beef -Peas");
        assert_eq!(query.include_groups.len(), 1);
        assert!(query.excludes.contains("beef"));
        assert!(query.excludes.contains("peas"));
        assert!(query.excludes.contains("pea"));
        assert_eq!(
            query.label_excludes,
            BTreeSet::from(["beef".to_string(), "peas".to_string()])
        );
        // An exclude-prefixed neighbour never forms a phrase.
        assert!(!query.include_groups[0].contains("chicken_beef"));
    }

    #[test]
    fn test_exclude_phrase() {
        let query = parse("-with grain salmon");
        assert!(query.include_groups.len() == 1);
        assert!(query.excludes.contains("with_grain"));
        assert!(query.excludes.contains("contains_grain"));
        assert!(query.label_excludes.contains("with_grain"));
        assert!(query.include_groups[0].contains("salmon"));
    }

    #[test]
    fn test_synonym_expansion_in_group() {
        let query = parse("protein totw");
        assert!(query.include_groups[0].contains("has_protein"));
        assert!(query.include_groups[1].contains("taste_of_the_wild"));
    }

    #[test]
    fn test_group_order_preserved() {
        let query = parse("lamb rice pumpkin");
        let firsts: Vec<bool> = query
            .include_groups
            .iter()
            .zip(["lamb", "rice", "pumpkin"])
            .map(|(group, term)| group.contains(term))
            .collect();
        assert_eq!(firsts, vec![true, true, true]);
    }

    #[test]
    fn test_punctuation_only_neighbour_skipped() {
        let query = parse("duck !!");
        assert_eq!(query.include_groups, vec![QueryGroup::from(["duck".to_string()])]);
    }
}
