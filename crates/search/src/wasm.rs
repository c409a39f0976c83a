//! WASM bindings for the browser filter UI.
//!
//! All functions take and return JSON strings so the page can pass the
//! catalog it already holds without extra marshalling.

use crate::{evaluate_protein_purity, normalize, parse_query, rank_catalog, Lexicon, ProductRecord, RankOptions};
use wasm_bindgen::prelude::*;

/// Rank products against a query.
///
/// # Arguments
/// * `query` - Raw query typed by the user
/// * `products_json` - JSON array of product records (or `{ "products": [...] }`)
/// * `max_results` - Maximum results to return (0 for all)
///
/// # Returns
/// JSON object with `active`, `labels`, `total` and ranked `results`
#[wasm_bindgen]
pub fn search_products(query: &str, products_json: &str, max_results: u32) -> Result<String, JsValue> {
    let products = ProductRecord::from_json_catalog(products_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let options = RankOptions {
        max_results: if max_results == 0 { None } else { Some(max_results as usize) },
        ..RankOptions::default()
    };
    let outcome = rank_catalog(&products, query, Lexicon::builtin(), &options);

    serde_json::to_string(&outcome)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Classify protein purity.
///
/// # Arguments
/// * `sources_json` - JSON array of protein source names
///
/// # Returns
/// JSON object with `percent` and `tier`
#[wasm_bindgen]
pub fn protein_purity(sources_json: &str) -> Result<String, JsValue> {
    let sources: Vec<String> = serde_json::from_str(sources_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let purity = evaluate_protein_purity(&sources, Lexicon::builtin());

    serde_json::to_string(&purity)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Normalize text into a matching token.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    normalize(text)
}

/// Parsed filter labels for the query chips.
///
/// # Returns
/// JSON object with `includes` and `excludes` arrays
#[wasm_bindgen]
pub fn describe_query(query: &str) -> String {
    let labels = parse_query(query, Lexicon::builtin()).labels();
    serde_json::to_string(&labels).unwrap_or_else(|_| r#"{"includes":[],"excludes":[]}"#.to_string())
}
