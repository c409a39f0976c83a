//! Synonym-aware product filtering for pet food catalogs.
//!
//! This crate provides:
//! - Token normalization and plural morphology
//! - Config-driven synonym and phrase expansion ([`Lexicon`])
//! - Include/exclude query parsing with grain-direction phrases
//! - Ingredient-position-aware match scoring
//! - Protein purity classification
//! - Catalog ranking with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use petfood_search::{rank_catalog, Lexicon, ProductRecord, RankOptions};
//!
//! let catalog = ProductRecord::from_json_catalog(r#"[
//!     {"id": "p1", "name": "Chicken Recipe", "brand": "Acme",
//!      "contains_grain": false, "protein_sources": ["chicken"],
//!      "ingredients_list": "chicken;peas;chicken_meal"}
//! ]"#).unwrap();
//!
//! let outcome = rank_catalog(&catalog, "grain free chicken", Lexicon::builtin(), &RankOptions::default());
//! let top = &outcome.results[0].result;
//! assert_eq!(top.match_percent, 100);
//! assert_eq!(top.matched_groups, top.needed_groups);
//! ```

mod error;
mod index;
mod ingredients;
mod lexicon;
mod matcher;
mod normalize;
mod product;
mod purity;
mod query;
mod rank;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{Result, SearchError, SearchErrorCode};
pub use index::{
    grain_status_tokens, has_token, has_token_exclude, ordered_ingredients, token_set, ProductIndex, TokenSet,
};
pub use ingredients::{evaluate_ingredient_group_score, ingredient_token_matches, IngredientScore};
pub use lexicon::{FormSuffix, GrainDirection, GrainVocabulary, Lexicon, PhraseConfig, ProteinVocabulary};
pub use matcher::{compute_match, evaluate_group, GroupOutcome, MatchResult};
pub use normalize::{normalize, plural_variants};
pub use product::ProductRecord;
pub use purity::{
    classify, evaluate_protein_purity, parse_protein_source, ProteinForm, ProteinParse, ProteinPurity,
    PurityTier,
};
pub use query::{parse_query, ParsedQuery, QueryGroup, QueryLabels};
pub use rank::{compare_ranked, rank_catalog, rank_parsed, score_all, RankOptions, RankedProduct, SearchOutcome};
