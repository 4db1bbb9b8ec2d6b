//! Sub-score functions
//!
//! Each function returns a score in range [0.0, 1.0] where 1.0 is a full
//! match. The scorer combines them with the configured weights.

use crate::query::CategoryHint;
use crate::rules::classify_category;
use crate::tokenizer::singular;

/// Review count at which the popularity part of the quality prior saturates
const REVIEW_SATURATION: f64 = 10_000.0;

/// Fraction of `terms` found in `haystack`, and the terms that matched.
///
/// `haystack` must already be lowercase. A term matches when it, or its
/// singular form, occurs as a substring.
pub fn keyword_overlap(terms: &[String], haystack: &str) -> (f64, Vec<String>) {
    if terms.is_empty() {
        return (0.0, Vec::new());
    }

    let matched: Vec<String> = terms
        .iter()
        .filter(|term| haystack.contains(term.as_str()) || haystack.contains(singular(term)))
        .cloned()
        .collect();

    (matched.len() as f64 / terms.len() as f64, matched)
}

/// How well a product category fits the category the query asks for
///
/// * `1.0` - same canonical category
/// * `0.6` - the product category contains the hint, or belongs to it as a family
/// * `0.3` - siblings in the same family
/// * `0.0` - unrelated, or no hint
pub fn category_match(hint: Option<&CategoryHint>, product_category: &str) -> f64 {
    let Some(hint) = hint else {
        return 0.0;
    };
    let category = product_category.trim().to_lowercase();

    match classify_category(&category) {
        Some(rule) if rule.canonical == hint.name => 1.0,
        Some(rule) if category.contains(hint.name.as_str()) || rule.family == hint.name => 0.6,
        Some(rule) if rule.family == hint.family => 0.3,
        Some(_) => 0.0,
        None if category == hint.name => 1.0,
        None if category.contains(hint.name.as_str()) || hint.name.contains(category.as_str()) => {
            0.6
        }
        None => 0.0,
    }
}

/// Rating and review volume prior
pub fn quality_prior(rating: f64, review_count: u64) -> f64 {
    let rating_part = (rating / 5.0).clamp(0.0, 1.0);
    let review_part = ((review_count as f64).ln_1p() / REVIEW_SATURATION.ln_1p()).min(1.0);
    (0.7 * rating_part + 0.3 * review_part).clamp(0.0, 1.0)
}

/// 1.0 when the attribute text contains any of the patterns
pub fn text_preference(value: Option<&str>, any_of: &[&str]) -> f64 {
    match value {
        Some(text) => {
            let text = text.to_lowercase();
            if any_of.iter().any(|p| text.contains(p)) {
                1.0
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(name: &str, family: &str) -> CategoryHint {
        CategoryHint {
            name: name.to_string(),
            family: family.to_string(),
        }
    }

    #[test]
    fn test_keyword_overlap_fraction() {
        let terms = vec!["gaming".to_string(), "laptops".to_string(), "pink".to_string()];
        let (score, matched) = keyword_overlap(&terms, "asus rog strix | gaming laptop");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(matched, vec!["gaming", "laptops"]);

        assert_eq!(keyword_overlap(&[], "anything").0, 0.0);
    }

    #[test]
    fn test_category_levels() {
        let gaming = hint("gaming laptop", "laptop");
        assert_eq!(category_match(Some(&gaming), "Gaming Laptop"), 1.0);
        assert_eq!(category_match(Some(&gaming), "Ultrabook"), 0.3);
        assert_eq!(category_match(Some(&gaming), "Running Shoes"), 0.0);

        let laptop = hint("laptop", "laptop");
        assert_eq!(category_match(Some(&laptop), "Gaming Laptop"), 0.6);
        assert_eq!(category_match(Some(&laptop), "Ultrabook"), 0.6);
        assert_eq!(category_match(Some(&laptop), "2-in-1 Laptop"), 0.6);

        let convertible = hint("2-in-1", "laptop");
        assert_eq!(category_match(Some(&convertible), "2-in-1 Laptop"), 1.0);

        assert_eq!(category_match(None, "Gaming Laptop"), 0.0);
    }

    #[test]
    fn test_unknown_product_categories() {
        let shoes = hint("shoes", "shoes");
        assert_eq!(category_match(Some(&shoes), "shoes"), 1.0);
        assert_eq!(category_match(Some(&shoes), "Eco-Friendly"), 0.0);
    }

    #[test]
    fn test_quality_prior_bounds() {
        assert_eq!(quality_prior(0.0, 0), 0.0);
        assert!((quality_prior(5.0, 10_000) - 1.0).abs() < 1e-9);
        assert!((quality_prior(5.0, 1_000_000) - 1.0).abs() < 1e-9);
        assert!(quality_prior(4.8, 100) > quality_prior(4.5, 100));
    }

    #[test]
    fn test_text_preference() {
        let gpus = ["rtx", "gtx"];
        assert_eq!(text_preference(Some("NVIDIA GeForce RTX 4060"), &gpus), 1.0);
        assert_eq!(text_preference(Some("Intel Iris Xe"), &gpus), 0.0);
        assert_eq!(text_preference(None, &gpus), 0.0);
    }
}
