//! Filtering and ordering of scored candidates

use ordered_float::OrderedFloat;
use serde::Serialize;
use shopmatch_core::ProductId;
use std::cmp::Ordering;
use tracing::debug;

use crate::query::StructuredQuery;
use crate::scorer::ScoredCandidate;

/// A product removed for failing a hard constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disqualified {
    pub product_id: ProductId,
    pub reason: String,
}

/// Ranked candidates for one query
#[derive(Debug, Clone)]
pub struct ResultSet<'a> {
    /// Ordered best first, at most `limit` long
    pub candidates: Vec<ScoredCandidate<'a>>,
    /// Survivors of the hard-constraint filter, before truncation
    pub total_candidates: usize,
    /// Every product that was scored
    pub scored: usize,
    pub query: StructuredQuery,
    pub disqualified: Vec<Disqualified>,
}

impl ResultSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Total order on candidates: score, then rating, then review count, all
/// descending, then product id ascending.
pub fn ranking_order(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    OrderedFloat(b.score)
        .cmp(&OrderedFloat(a.score))
        .then_with(|| OrderedFloat(b.product.rating).cmp(&OrderedFloat(a.product.rating)))
        .then_with(|| b.product.review_count.cmp(&a.product.review_count))
        .then_with(|| a.product.id.cmp(&b.product.id))
}

/// Drop hard-constraint violators (when `require_hard`), sort and truncate
pub fn rank<'a>(
    candidates: Vec<ScoredCandidate<'a>>,
    query: StructuredQuery,
    limit: usize,
    require_hard: bool,
) -> ResultSet<'a> {
    let scored = candidates.len();
    let mut disqualified = Vec::new();

    let mut survivors: Vec<ScoredCandidate<'a>> = if require_hard {
        candidates
            .into_iter()
            .filter(|candidate| {
                if !candidate.violates_hard_constraint() {
                    return true;
                }
                let reason = candidate.explanation.violations.join("; ");
                debug!(product = %candidate.product.id, %reason, "Disqualified");
                disqualified.push(Disqualified {
                    product_id: candidate.product.id.clone(),
                    reason,
                });
                false
            })
            .collect()
    } else {
        candidates
    };

    survivors.sort_by(ranking_order);
    let total_candidates = survivors.len();
    survivors.truncate(limit);

    debug!(
        scored,
        total_candidates,
        returned = survivors.len(),
        disqualified = disqualified.len(),
        "Ranked candidates"
    );

    ResultSet {
        candidates: survivors,
        total_candidates,
        scored,
        query,
        disqualified,
    }
}
