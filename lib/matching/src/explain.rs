//! Explainability for ranked results
//!
//! Turns a [`ResultSet`] into the serializable search response, showing for
//! each result the factors that contributed most to its match score.

use serde::Serialize;
use shopmatch_core::filter::fmt_value;
use shopmatch_core::{NumericSpecs, Product, ProductId, TextSpecs};

use crate::query::StructuredQuery;
use crate::rank::{Disqualified, ResultSet};
use crate::scorer::{ComponentScore, ScoredCandidate};
use crate::weights::Component;

/// Factors listed per result
const MAX_FACTORS: usize = 3;

/// One contribution to a match score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    pub factor: Component,
    /// Points out of 100, rounded to one decimal
    pub points: f64,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub list: u64,
    pub selling: u64,
    pub discount_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(flatten)]
    pub numeric: NumericSpecs,
    #[serde(flatten)]
    pub text: TextSpecs,
}

/// A ranked product with its explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub specs: SpecsView,
    pub price: PriceView,
    pub rating: f64,
    pub review_count: u64,
    /// Integer match score in [0, 100]
    pub match_score: u8,
    pub match_explanation: Vec<Factor>,
}

/// Aggregate statistics over one search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub candidates_scored: usize,
    pub results_returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    /// Component contributing most points across the returned results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_factor: Option<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<ResultEntry>,
    pub total_candidates: usize,
    pub applied_query: StructuredQuery,
    pub disqualified: Vec<Disqualified>,
    pub stats: SearchStats,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Build the response for a result set
pub fn assemble(result: ResultSet<'_>) -> SearchResponse {
    let stats = compute_stats(&result);
    let results = result
        .candidates
        .iter()
        .map(|candidate| explain_candidate(candidate, &result.query))
        .collect();

    SearchResponse {
        results,
        total_candidates: result.total_candidates,
        applied_query: result.query,
        disqualified: result.disqualified,
        stats,
    }
}

fn compute_stats(result: &ResultSet<'_>) -> SearchStats {
    let returned = result.candidates.len();
    let best_score = result.candidates.first().map(|c| c.score.round() as u8);
    let average_score = (returned > 0).then(|| {
        round1(result.candidates.iter().map(|c| c.score).sum::<f64>() / returned as f64)
    });

    let top_factor = Component::ALL
        .into_iter()
        .map(|component| {
            let total: f64 = result
                .candidates
                .iter()
                .map(|c| c.explanation.component(component).points)
                .sum();
            (component, total)
        })
        .filter(|(_, total)| *total > 0.0)
        .fold(None, |best: Option<(Component, f64)>, (component, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ => Some((component, total)),
        })
        .map(|(component, _)| component);

    SearchStats {
        candidates_scored: result.scored,
        results_returned: returned,
        best_score,
        average_score,
        top_factor,
    }
}

/// Create an explained entry for one candidate
pub fn explain_candidate(candidate: &ScoredCandidate<'_>, query: &StructuredQuery) -> ResultEntry {
    let product = candidate.product;

    let mut components: Vec<&ComponentScore> = candidate
        .explanation
        .components
        .iter()
        .filter(|c| c.points > 0.0)
        .collect();
    // stable sort keeps component order on equal points
    components.sort_by(|a, b| b.points.total_cmp(&a.points));

    let match_explanation = components
        .into_iter()
        .take(MAX_FACTORS)
        .map(|c| Factor {
            factor: c.component,
            points: round1(c.points),
            detail: describe(c.component, candidate, query),
        })
        .collect();

    ResultEntry {
        product_id: product.id.clone(),
        name: product.name.clone(),
        category: product.category.clone(),
        brand: product.brand.clone(),
        specs: SpecsView {
            series: product.series.clone(),
            numeric: product.numeric.clone(),
            text: product.text.clone(),
        },
        price: PriceView {
            list: product.price.list,
            selling: product.price.selling,
            discount_percent: product.discount_percent(),
        },
        rating: product.rating,
        review_count: product.review_count,
        match_score: candidate.score.round().clamp(0.0, 100.0) as u8,
        match_explanation,
    }
}

fn describe(component: Component, candidate: &ScoredCandidate<'_>, query: &StructuredQuery) -> String {
    let explanation = &candidate.explanation;
    let product: &Product = candidate.product;

    match component {
        Component::Keyword => format!(
            "matched {} of {} terms: {}",
            explanation.matched_terms.len(),
            query.terms.len(),
            explanation.matched_terms.join(", ")
        ),
        Component::Category => {
            let hint = query
                .category
                .as_ref()
                .map(|h| h.name.as_str())
                .unwrap_or_default();
            let value = explanation.component(Component::Category).value;
            if value >= 1.0 {
                format!("category {} matches {}", product.category, hint)
            } else {
                format!("category {} is related to {}", product.category, hint)
            }
        }
        Component::Constraints => {
            let met: Vec<&str> = explanation
                .checks
                .iter()
                .filter(|c| c.score >= 1.0)
                .map(|c| c.label.as_str())
                .collect();
            if met.is_empty() {
                format!("partially meets {} checks", explanation.checks.len())
            } else {
                format!("meets {}", met.join(", "))
            }
        }
        Component::Quality => format!(
            "rated {} from {} reviews",
            fmt_value(product.rating),
            product.review_count
        ),
    }
}
