//! Per-product match scoring.
//!
//! [`compute_match`] is a pure function of a product, a parsed query and a
//! lexicon. It never looks at other products, so catalog scoring can run in
//! any order or in parallel.

use crate::index::{has_token, has_token_exclude, ProductIndex, TokenSet};
use crate::ingredients::{evaluate_ingredient_group_score, IngredientScore};
use crate::lexicon::{GrainDirection, Lexicon};
use crate::product::ProductRecord;
use crate::purity::{evaluate_protein_purity, PurityTier};
use crate::query::{ParsedQuery, QueryGroup};
use serde::{Deserialize, Serialize};

/// Weight of the match percentage in the composite sort key.
pub const MATCH_WEIGHT: u64 = 1000;
/// Weight of ingredient prominence in the composite sort key.
pub const RANK_BOOST_WEIGHT: u64 = 10;

/// Scoring outcome for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Weighted match percentage, 0-100
    #[serde(rename = "match")]
    pub match_percent: u32,
    /// Composite ordering key, higher first
    pub sort_score: u64,
    /// Include groups the product satisfied
    pub matched_groups: usize,
    /// Include groups in the query
    pub needed_groups: usize,
    /// Whether the product passes the filter
    pub show: bool,
    /// Sum of per-group maximum mention counts
    pub frequency_score: u64,
    /// Sum of `len - index` over ingredient-matched groups
    pub ingredient_rank_boost: u64,
    /// Protein purity tier of the product
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<PurityTier>,
    /// Protein purity percent of the product
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purity_percent: Option<u8>,
}

impl MatchResult {
    /// Result for a product that is filtered out before scoring.
    fn hidden(needed_groups: usize) -> Self {
        Self {
            match_percent: 0,
            sort_score: 0,
            matched_groups: 0,
            needed_groups,
            show: false,
            frequency_score: 0,
            ingredient_rank_boost: 0,
            tier: None,
            purity_percent: None,
        }
    }
}

/// Evaluation of one include group against one product.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    /// Any token satisfied [`has_token`]
    pub matched: bool,
    /// Grain status the group demands
    pub direction: Option<GrainDirection>,
    /// The product actually carries the demanded grain status
    pub direction_satisfied: bool,
    /// Position score against the ordered ingredients
    pub ingredient: IngredientScore,
    /// Highest mention count of any group token
    pub frequency: usize,
}

/// Evaluate one include group.
pub fn evaluate_group(group: &QueryGroup, index: &ProductIndex, lexicon: &Lexicon) -> GroupOutcome {
    let matched = group.iter().any(|token| has_token(&index.tokens, token));
    let direction = lexicon.grain_direction(group);
    let direction_satisfied = direction.is_some_and(|direction| {
        satisfies_direction(group, direction, &index.grain_status, lexicon)
    });

    GroupOutcome {
        matched,
        direction,
        direction_satisfied,
        ingredient: evaluate_ingredient_group_score(group, &index.ordered_ingredients),
        frequency: group
            .iter()
            .map(|token| index.mention_count(token))
            .max()
            .unwrap_or(0),
    }
}

/// A directional group is satisfied only when the record's grain status
/// holds one of its reference tokens exactly. Name words never count, and
/// neither do prefixes (`grain` must not match `grain_free`).
fn satisfies_direction(
    group: &QueryGroup,
    direction: GrainDirection,
    grain_status: &TokenSet,
    lexicon: &Lexicon,
) -> bool {
    let reference = lexicon.grain_reference(direction);
    group
        .iter()
        .filter(|token| reference.contains(*token))
        .any(|token| grain_status.contains(token))
}

/// Score a product against a parsed query.
///
/// # Example
/// ```
/// use petfood_search::{compute_match, parse_query, Lexicon, ProductRecord};
///
/// let mut product = ProductRecord::new("p1", "Chicken Recipe");
/// product.contains_grain = Some(false);
/// product.protein_sources = vec!["chicken".to_string()];
/// product.ingredients_list = "chicken;peas;chicken_meal".to_string();
///
/// let lexicon = Lexicon::builtin();
/// let result = compute_match(&product, &parse_query("grain free chicken", lexicon), lexicon);
/// assert!(result.show);
/// assert_eq!(result.match_percent, 100);
/// assert_eq!(result.matched_groups, 2);
/// ```
pub fn compute_match(product: &ProductRecord, query: &ParsedQuery, lexicon: &Lexicon) -> MatchResult {
    let index = ProductIndex::build(product, lexicon);
    let needed_groups = query.include_groups.len();

    if query
        .excludes
        .iter()
        .any(|token| has_token_exclude(&index, token, lexicon))
    {
        return MatchResult::hidden(needed_groups);
    }

    let purity = evaluate_protein_purity(&product.protein_sources, lexicon);
    let outcomes: Vec<GroupOutcome> = query
        .include_groups
        .iter()
        .map(|group| evaluate_group(group, &index, lexicon))
        .collect();

    let matched_groups = outcomes.iter().filter(|o| o.matched).count();

    let mut show = !(needed_groups > 0 && matched_groups == 0);
    for direction in [GrainDirection::With, GrainDirection::Without] {
        let mut demanded = outcomes.iter().filter(|o| o.direction == Some(direction)).peekable();
        if demanded.peek().is_some() && !demanded.any(|o| o.matched && o.direction_satisfied) {
            show = false;
        }
    }

    let match_percent = if matched_groups == 0 || needed_groups == 0 {
        0
    } else {
        let weighted: f64 = outcomes
            .iter()
            .filter(|o| o.matched)
            .map(|o| if o.ingredient.matched { o.ingredient.score } else { 1.0 })
            .sum();
        (weighted / needed_groups as f64 * 100.0).round() as u32
    };

    let sequence_len = index.ordered_ingredients.len();
    let frequency_score: u64 = outcomes.iter().map(|o| o.frequency as u64).sum();
    let ingredient_rank_boost: u64 = outcomes
        .iter()
        .filter_map(|o| o.ingredient.index)
        .map(|i| (sequence_len - i) as u64)
        .sum();

    let sort_score = u64::from(match_percent) * MATCH_WEIGHT
        + ingredient_rank_boost * RANK_BOOST_WEIGHT
        + frequency_score;

    MatchResult {
        match_percent,
        sort_score,
        matched_groups,
        needed_groups,
        show,
        frequency_score,
        ingredient_rank_boost,
        tier: Some(purity.tier),
        purity_percent: Some(purity.percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;
    use proptest::prelude::*;

    fn p1() -> ProductRecord {
        ProductRecord {
            id: "p1".to_string(),
            name: "Chicken Recipe".to_string(),
            brand: "Acme".to_string(),
            contains_grain: Some(false),
            protein_sources: vec!["chicken".to_string()],
            ingredients_list: "chicken;peas;chicken_meal".to_string(),
            ..ProductRecord::default()
        }
    }

    fn score(product: &ProductRecord, query: &str) -> MatchResult {
        let lexicon = Lexicon::builtin();
        compute_match(product, &parse_query(query, lexicon), lexicon)
    }

    #[test]
    fn test_grain_free_chicken_full_match() {
        let result = score(&p1(), "grain free chicken");
        assert!(result.show);
        assert_eq!(result.match_percent, 100);
        assert_eq!(result.matched_groups, 2);
        assert_eq!(result.needed_groups, 2);
        assert_eq!(result.tier, Some(PurityTier::Pure));
        assert_eq!(result.purity_percent, Some(100));
    }

    #[test]
    fn test_exclude_hides() {
        let result = score(&p1(), "-chicken");
        assert!(!result.show);
        assert_eq!(result.match_percent, 0);
        assert_eq!(result.sort_score, 0);
    }

    #[test]
    fn test_exclude_veto_beats_includes() {
        let result = score(&p1(), "chicken grain free -peas");
        assert!(!result.show);
        assert_eq!(result.needed_groups, 2);
        assert_eq!(result.matched_groups, 0);
    }

    #[test]
    fn test_grain_include_hides_grain_free_product() {
        let result = score(&p1(), "grain chicken");
        assert!(!result.show);
    }

    #[test]
    fn test_grain_word_in_name_does_not_satisfy_grain_include() {
        let mut product = p1();
        product.name = "Grain Free Chicken Recipe".to_string();
        let result = score(&product, "grain chicken");
        assert!(!result.show);
        assert!(score(&product, "grain free chicken").show);
    }

    #[test]
    fn test_excluding_grain_keeps_grain_free_product_named_grain() {
        let mut product = p1();
        product.name = "Grain Free Chicken Recipe".to_string();
        let result = score(&product, "chicken -grain");
        assert!(result.show);
        assert_eq!(result.match_percent, 100);
    }

    #[test]
    fn test_rank_boost_counts_ingredient_only_groups() {
        let mut product = p1();
        product.name = "Garden Dinner".to_string();
        product.protein_sources.clear();
        product.ingredients_list = "sweet potato;chicken".to_string();
        let result = score(&product, "chicken potato");
        assert_eq!(result.matched_groups, 1);
        // chicken at index 1 of 2, potato inside sweet_potato at index 0
        assert_eq!(result.ingredient_rank_boost, 1 + 2);
    }

    #[test]
    fn test_grain_include_shows_grain_product() {
        let mut product = p1();
        product.contains_grain = Some(true);
        assert!(score(&product, "grain chicken").show);
        assert!(!score(&product, "grain free").show);
    }

    #[test]
    fn test_unknown_grain_fails_both_directions() {
        let mut product = p1();
        product.contains_grain = None;
        assert!(!score(&product, "grain free").show);
        assert!(!score(&product, "with grains").show);
        assert!(score(&product, "chicken").show);
    }

    #[test]
    fn test_exclude_grain_keeps_grain_free_product() {
        assert!(score(&p1(), "-grain").show);
        assert!(score(&p1(), "chicken -grains").show);

        let mut grainy = p1();
        grainy.contains_grain = Some(true);
        assert!(!score(&grainy, "-grain").show);
    }

    #[test]
    fn test_no_matching_group_hides() {
        let result = score(&p1(), "lamb");
        assert!(!result.show);
        assert_eq!(result.match_percent, 0);
        assert_eq!(result.matched_groups, 0);
    }

    #[test]
    fn test_partial_match_is_shown() {
        let result = score(&p1(), "chicken lamb");
        assert!(result.show);
        assert_eq!(result.matched_groups, 1);
        assert_eq!(result.match_percent, 50);
    }

    #[test]
    fn test_name_only_match_scores_flat() {
        // "recipe" appears in the name but in no ingredient.
        let result = score(&p1(), "recipe");
        assert!(result.show);
        assert_eq!(result.match_percent, 100);
        assert_eq!(result.ingredient_rank_boost, 0);
    }

    #[test]
    fn test_positional_weighting() {
        let result = score(&p1(), "peas");
        // peas is second of four ordered ingredients: 1 - 1/4
        assert_eq!(result.match_percent, 75);
        assert_eq!(result.ingredient_rank_boost, 3);
    }

    #[test]
    fn test_empty_query_shows_with_zero_match() {
        let result = score(&p1(), "");
        assert!(result.show);
        assert_eq!(result.match_percent, 0);
        assert_eq!(result.needed_groups, 0);
    }

    #[test]
    fn test_sort_score_composition() {
        let result = score(&p1(), "chicken");
        // chicken at index 0 of 4 -> boost 4; mentions: chicken, chicken (root), chicken (protein)
        assert_eq!(result.ingredient_rank_boost, 4);
        assert_eq!(result.frequency_score, 3);
        assert_eq!(result.sort_score, 100 * 1000 + 4 * 10 + 3);
    }

    #[test]
    fn test_ingredient_rank_ordering() {
        let mut first = p1();
        first.ingredients_list = "chicken;peas;rice;lentils".to_string();
        first.protein_sources.clear();
        let mut last = first.clone();
        last.ingredients_list = "peas;rice;lentils;chicken".to_string();

        let a = score(&first, "chicken");
        let b = score(&last, "chicken");
        assert!(a.show && b.show);
        assert!(a.sort_score > b.sort_score);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(score(&p1(), "chicken")).unwrap();
        assert_eq!(json["match"], 100);
        assert!(json.get("sortScore").is_some());
        assert!(json.get("matchedGroups").is_some());
        assert_eq!(json["tier"], "pure");
    }

    fn arbitrary_product() -> impl Strategy<Value = ProductRecord> {
        (
            "[a-z ]{0,12}",
            prop::option::of(any::<bool>()),
            prop::collection::vec("[a-z]{1,6}( meal| fat)?", 0..3),
            prop::collection::vec("[a-z]{1,6}", 0..5),
        )
            .prop_map(|(name, contains_grain, protein_sources, ingredients)| ProductRecord {
                name,
                contains_grain,
                protein_sources,
                ingredients_list: ingredients.join(";"),
                ..ProductRecord::default()
            })
    }

    proptest! {
        #[test]
        fn prop_adding_tokens_never_loses_groups(
            product in arbitrary_product(),
            extra in "[a-z]{1,6}",
            query in "[a-z]{1,6}( [a-z]{1,6}){0,3}",
        ) {
            let lexicon = Lexicon::builtin();
            let parsed = parse_query(&query, lexicon);
            let before = compute_match(&product, &parsed, lexicon);

            let mut richer = product.clone();
            richer.ingredients_list.push(';');
            richer.ingredients_list.push_str(&extra);
            let after = compute_match(&richer, &parsed, lexicon);

            prop_assert!(parsed.excludes.is_empty());
            prop_assert!(after.matched_groups >= before.matched_groups);
        }

        #[test]
        fn prop_exclude_veto(product in arbitrary_product(), include in "[a-z]{1,6}") {
            let lexicon = Lexicon::builtin();
            let index = ProductIndex::build(&product, lexicon);
            let parsed = parse_query(&format!("{} -no_protein", include), lexicon);
            let vetoed = parsed.excludes.iter().any(|t| has_token_exclude(&index, t, lexicon));
            let result = compute_match(&product, &parsed, lexicon);
            if vetoed {
                prop_assert!(!result.show);
            }
        }
    }
}
