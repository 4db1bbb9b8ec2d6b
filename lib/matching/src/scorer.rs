//! Scorer for product candidates
//!
//! Computes the four sub-scores for a product against a structured query and
//! combines them into a single match score in range [0, 100], keeping every
//! intermediate value for the explanation.

use rayon::prelude::*;
use shopmatch_core::{Outcome, Product};
use smallvec::SmallVec;
use tracing::debug;

use crate::query::{PreferenceKind, StructuredQuery};
use crate::subscore::{category_match, keyword_overlap, quality_prior, text_preference};
use crate::weights::{Component, ScoreWeights};

/// A sub-score and its weighted contribution to the match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScore {
    pub component: Component,
    /// Sub-score in [0, 1]
    pub value: f64,
    /// Contribution in points out of 100
    pub points: f64,
}

/// Whether a check came from an explicit bound or a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Hard,
    Soft,
}

/// Outcome of one constraint or preference against a product
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintCheck {
    pub kind: CheckKind,
    pub label: String,
    pub weight: f64,
    /// Satisfaction in [0, 1]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub components: [ComponentScore; 4],
    pub matched_terms: Vec<String>,
    pub checks: SmallVec<[ConstraintCheck; 4]>,
    /// Reasons for every failed hard constraint
    pub violations: SmallVec<[String; 2]>,
}

impl Explanation {
    pub fn component(&self, component: Component) -> &ComponentScore {
        // components are stored in Component::ALL order
        &self.components[component as usize]
    }
}

/// A product with its match score
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub product: &'a Product,
    /// Match score in [0, 100]
    pub score: f64,
    pub explanation: Explanation,
}

impl ScoredCandidate<'_> {
    pub fn violates_hard_constraint(&self) -> bool {
        !self.explanation.violations.is_empty()
    }
}

/// Scores products against a structured query
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
    hard_as_soft: bool,
}

impl Scorer {
    /// Create a scorer with the given weights. Weights are assumed validated.
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            hard_as_soft: false,
        }
    }

    /// Grade hard constraints by closeness instead of pass/fail. Violations
    /// are still recorded.
    pub fn hard_as_soft(mut self, enabled: bool) -> Self {
        self.hard_as_soft = enabled;
        self
    }

    /// Score one product. Never fails.
    pub fn score<'a>(&self, product: &'a Product, query: &StructuredQuery) -> ScoredCandidate<'a> {
        let haystack = product.search_text();
        let (keyword, matched_terms) = keyword_overlap(&query.terms, &haystack);
        let category = category_match(query.category.as_ref(), &product.category);
        let (constraints, checks, violations) = self.constraint_score(product, query);
        let quality = quality_prior(product.rating, product.review_count);

        let values = [keyword, category, constraints, quality];
        let components = Component::ALL.map(|component| {
            let value = values[component as usize];
            ComponentScore {
                component,
                value,
                points: value * self.weights.get(component) * 100.0,
            }
        });

        let score = components
            .iter()
            .map(|c| c.points)
            .sum::<f64>()
            .clamp(0.0, 100.0);

        ScoredCandidate {
            product,
            score,
            explanation: Explanation {
                components,
                matched_terms,
                checks,
                violations,
            },
        }
    }

    /// Weighted mean over hard constraints and soft preferences. 0.0 when the
    /// query has neither.
    fn constraint_score(
        &self,
        product: &Product,
        query: &StructuredQuery,
    ) -> (f64, SmallVec<[ConstraintCheck; 4]>, SmallVec<[String; 2]>) {
        let mut checks: SmallVec<[ConstraintCheck; 4]> = SmallVec::new();
        let mut violations: SmallVec<[String; 2]> = SmallVec::new();

        for constraint in query.hard_constraints() {
            let score = match constraint.check(product) {
                Outcome::Satisfied => 1.0,
                Outcome::Violated(v) if self.hard_as_soft => constraint.range.closeness(v),
                Outcome::Violated(_) | Outcome::Unknown => 0.0,
            };
            if let Some(reason) = constraint.failure_reason(product) {
                violations.push(reason);
            }
            checks.push(ConstraintCheck {
                kind: CheckKind::Hard,
                label: constraint.to_string(),
                weight: query.hard_weight(constraint.attribute),
                score,
            });
        }

        for preference in &query.preferences {
            let score = match &preference.kind {
                PreferenceKind::Numeric { attribute, range } => attribute
                    .value_of(product)
                    .map(|v| range.closeness(v))
                    .unwrap_or(0.0),
                PreferenceKind::Text { attribute, any_of } => {
                    text_preference(attribute.value_of(product), any_of)
                }
            };
            checks.push(ConstraintCheck {
                kind: CheckKind::Soft,
                label: preference.to_string(),
                weight: preference.weight,
                score,
            });
        }

        let total_weight: f64 = checks.iter().map(|c| c.weight).sum();
        let value = if total_weight > 0.0 {
            checks.iter().map(|c| c.weight * c.score).sum::<f64>() / total_weight
        } else {
            0.0
        };

        (value.clamp(0.0, 1.0), checks, violations)
    }

    /// Score every product in parallel. Output follows input order.
    pub fn score_all<'a>(
        &self,
        products: &'a [Product],
        query: &StructuredQuery,
    ) -> Vec<ScoredCandidate<'a>> {
        let scored: Vec<ScoredCandidate<'a>> = products
            .par_iter()
            .map(|product| self.score(product, query))
            .collect();

        debug!(candidates = scored.len(), "Scored catalog");
        scored
    }
}
