//! Ingredient position scoring.
//!
//! Labels list ingredients by weight, so a match near the front of the list
//! says more about a product than one near the end.

use serde::{Deserialize, Serialize};

/// Outcome of scanning an ingredient sequence for a group of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngredientScore {
    /// Whether any token matched any ingredient
    pub matched: bool,
    /// `1 - index / len`, 0 when unmatched
    pub score: f64,
    /// Position of the earliest matching ingredient
    pub index: Option<usize>,
}

impl IngredientScore {
    /// The no-match outcome.
    pub const NONE: Self = Self {
        matched: false,
        score: 0.0,
        index: None,
    };
}

/// Check whether a query token names an ingredient slug.
///
/// Matches on equality, on an underscore-delimited prefix in either
/// direction, or (for single-word tokens) on any word of the ingredient.
///
/// # Example
/// ```
/// use petfood_search::ingredient_token_matches;
///
/// assert!(ingredient_token_matches("chicken", "chicken_meal"));
/// assert!(ingredient_token_matches("potato", "sweet_potato"));
/// assert!(!ingredient_token_matches("pea", "peas"));
/// ```
pub fn ingredient_token_matches(token: &str, ingredient: &str) -> bool {
    if token.is_empty() || ingredient.is_empty() {
        return false;
    }
    if token == ingredient {
        return true;
    }
    if is_compound_prefix(token, ingredient) || is_compound_prefix(ingredient, token) {
        return true;
    }
    !token.contains('_') && ingredient.split('_').any(|word| word == token)
}

/// True if `ingredient` starts with `prefix` followed by an underscore.
#[inline]
fn is_compound_prefix(prefix: &str, ingredient: &str) -> bool {
    ingredient
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// Score a group of tokens against an ordered ingredient sequence.
///
/// Finds the earliest ingredient any token matches and scores it
/// `1 - index / len`: the first ingredient scores 1, later ones approach 0.
pub fn evaluate_ingredient_group_score<'a, I>(tokens: I, ordered_ingredients: &[String]) -> IngredientScore
where
    I: IntoIterator<Item = &'a String>,
    I::IntoIter: Clone,
{
    if ordered_ingredients.is_empty() {
        return IngredientScore::NONE;
    }

    let tokens = tokens.into_iter();
    let len = ordered_ingredients.len();

    ordered_ingredients
        .iter()
        .position(|ingredient| {
            tokens
                .clone()
                .any(|token| ingredient_token_matches(token, ingredient))
        })
        .map_or(IngredientScore::NONE, |index| IngredientScore {
            matched: true,
            score: 1.0 - index as f64 / len as f64,
            index: Some(index),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_token_matches_equal_and_prefix() {
        assert!(ingredient_token_matches("chicken", "chicken"));
        assert!(ingredient_token_matches("chicken", "chicken_fat"));
        assert!(ingredient_token_matches("chicken_meal", "chicken"));
        assert!(!ingredient_token_matches("chick", "chicken"));
    }

    #[test]
    fn test_token_matches_component() {
        assert!(ingredient_token_matches("rice", "brown_rice"));
        assert!(!ingredient_token_matches("brown_rice", "organic_brown_rice"));
        assert!(!ingredient_token_matches("", "rice"));
    }

    #[test]
    fn test_group_score_first_position() {
        let ingredients = seq(&["chicken", "peas", "rice"]);
        let tokens = seq(&["chicken"]);
        let score = evaluate_ingredient_group_score(&tokens, &ingredients);
        assert!(score.matched);
        assert_eq!(score.index, Some(0));
        assert_eq!(score.score, 1.0);
    }

    #[test]
    fn test_group_score_earliest_of_any_token() {
        let ingredients = seq(&["lamb", "peas", "salmon_meal", "chicken"]);
        let tokens = seq(&["chicken", "salmon"]);
        let score = evaluate_ingredient_group_score(&tokens, &ingredients);
        assert_eq!(score.index, Some(2));
        assert_eq!(score.score, 0.5);
    }

    #[test]
    fn test_group_score_last_position() {
        let ingredients = seq(&["lamb", "peas", "rice", "chicken"]);
        let tokens = seq(&["chicken"]);
        let score = evaluate_ingredient_group_score(&tokens, &ingredients);
        assert_eq!(score.score, 0.25);
    }

    #[test]
    fn test_group_score_no_match() {
        let tokens = seq(&["beef"]);
        assert_eq!(
            evaluate_ingredient_group_score(&tokens, &seq(&["lamb"])),
            IngredientScore::NONE
        );
        assert_eq!(evaluate_ingredient_group_score(&tokens, &[]), IngredientScore::NONE);
    }
}
