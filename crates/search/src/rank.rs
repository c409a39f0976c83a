//! Catalog ranking with optional parallelism.
//!
//! Scores every product against one parsed query, keeps the visible ones
//! and orders them for display.

use crate::lexicon::Lexicon;
use crate::matcher::{compute_match, MatchResult};
use crate::product::ProductRecord;
use crate::query::{parse_query, ParsedQuery, QueryLabels};
use serde::Serialize;
use std::cmp::Ordering;

/// Ranking options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Maximum number of results to return (None for all)
    pub max_results: Option<usize>,
    /// Keep products with `show == false` (ranked after the visible ones)
    pub include_hidden: bool,
}

/// A product paired with its match result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct<'a> {
    pub product: &'a ProductRecord,
    pub result: MatchResult,
}

/// Outcome of ranking a catalog.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome<'a> {
    /// False when the query had no include groups and no excludes
    pub active: bool,
    /// Parsed filters for display
    pub labels: QueryLabels,
    /// Number of products scored
    pub total: usize,
    /// Ranked results
    pub results: Vec<RankedProduct<'a>>,
}

/// Parse `query` and rank the catalog against it.
///
/// # Example
/// ```
/// use petfood_search::{rank_catalog, Lexicon, ProductRecord, RankOptions};
///
/// let mut lamb = ProductRecord::new("1", "Lamb Dinner");
/// lamb.ingredients_list = "lamb;rice".to_string();
/// let mut duck = ProductRecord::new("2", "Duck Feast");
/// duck.ingredients_list = "duck;peas".to_string();
/// let catalog = vec![lamb, duck];
///
/// let outcome = rank_catalog(&catalog, "lamb", Lexicon::builtin(), &RankOptions::default());
/// assert!(outcome.active);
/// assert_eq!(outcome.results.len(), 1);
/// assert_eq!(outcome.results[0].product.id, "1");
/// ```
pub fn rank_catalog<'a>(
    products: &'a [ProductRecord],
    query: &str,
    lexicon: &Lexicon,
    options: &RankOptions,
) -> SearchOutcome<'a> {
    let parsed = parse_query(query, lexicon);
    rank_parsed(products, &parsed, lexicon, options)
}

/// Rank the catalog against an already parsed query.
pub fn rank_parsed<'a>(
    products: &'a [ProductRecord],
    query: &ParsedQuery,
    lexicon: &Lexicon,
    options: &RankOptions,
) -> SearchOutcome<'a> {
    let mut results = score_all(products, query, lexicon);

    if !options.include_hidden {
        results.retain(|r| r.result.show);
    }
    results.sort_by(compare_ranked);

    if let Some(max) = options.max_results {
        results.truncate(max);
    }

    SearchOutcome {
        active: !query.is_empty(),
        labels: query.labels(),
        total: products.len(),
        results,
    }
}

/// Score every product, in catalog order.
pub fn score_all<'a>(
    products: &'a [ProductRecord],
    query: &ParsedQuery,
    lexicon: &Lexicon,
) -> Vec<RankedProduct<'a>> {
    let score = |product: &'a ProductRecord| RankedProduct {
        product,
        result: compute_match(product, query, lexicon),
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        products.par_iter().map(score).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        products.iter().map(score).collect()
    }
}

/// Display order: visible first, then sort score descending, then name
/// (case-insensitive, then exact), then id.
pub fn compare_ranked(a: &RankedProduct<'_>, b: &RankedProduct<'_>) -> Ordering {
    b.result
        .show
        .cmp(&a.result.show)
        .then_with(|| b.result.sort_score.cmp(&a.result.sort_score))
        .then_with(|| {
            a.product
                .name
                .to_lowercase()
                .cmp(&b.product.name.to_lowercase())
        })
        .then_with(|| a.product.name.cmp(&b.product.name))
        .then_with(|| a.product.id.cmp(&b.product.id))
}
