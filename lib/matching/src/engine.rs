//! Search entry points
//!
//! [`SearchEngine`] ties the pipeline together: interpret the query, score
//! the current catalog snapshot, rank and assemble the response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopmatch_core::{
    Catalog, CatalogSnapshot, Comparison, Error, LoadMode, LoadReport, NumericAttribute, Result,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::explain::{assemble, SearchResponse};
use crate::interpret::{add_bound, interpret};
use crate::rank::rank;
use crate::scorer::Scorer;
use crate::weights::ScoreWeights;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 1000;

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Results returned when a request does not set a limit
    pub default_limit: usize,
    /// Requested limits above this are capped
    pub max_limit: usize,
    pub weights: ScoreWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            weights: ScoreWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(Error::InvalidConfig(
                "default limit must be greater than 0".to_string(),
            ));
        }
        if self.max_limit < self.default_limit {
            return Err(Error::InvalidConfig(format!(
                "max limit {} is below the default limit {}",
                self.max_limit, self.default_limit
            )));
        }
        self.weights.validate()
    }
}

/// A caller-supplied bound, e.g. from a filter panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FilterSpec {
    pub fn new(attribute: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            attribute: attribute.to_string(),
            min,
            max,
        }
    }

    /// Inclusive bounds this filter adds
    fn bounds(&self) -> Result<(NumericAttribute, Vec<(Comparison, f64)>)> {
        let attribute = NumericAttribute::from_name(&self.attribute).ok_or_else(|| {
            Error::InvalidConfig(format!("unknown filter attribute: {}", self.attribute))
        })?;

        let mut bounds = Vec::with_capacity(2);
        for (cmp, value) in [(Comparison::AtLeast, self.min), (Comparison::AtMost, self.max)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "{} filter bound must be a number",
                        attribute
                    )));
                }
                bounds.push((cmp, v));
            }
        }

        match (self.min, self.max) {
            (None, None) => Err(Error::InvalidConfig(format!(
                "{} filter needs a min or a max",
                attribute
            ))),
            (Some(lo), Some(hi)) if lo > hi => Err(Error::InvalidConfig(format!(
                "{} filter min {} exceeds max {}",
                attribute, lo, hi
            ))),
            _ => Ok((attribute, bounds)),
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    /// Drop products that violate a hard constraint. When off, hard
    /// constraints only lower the score.
    pub require_all_hard_constraints: bool,
    pub weights: Option<ScoreWeights>,
    pub filters: Vec<FilterSpec>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            require_all_hard_constraints: true,
            weights: None,
            filters: Vec::new(),
        }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn soft_constraints(mut self) -> Self {
        self.require_all_hard_constraints = false;
        self
    }
}

/// Options after validation against the engine config
struct Plan {
    limit: usize,
    weights: ScoreWeights,
    require_hard: bool,
    filters: Vec<(NumericAttribute, Vec<(Comparison, f64)>)>,
}

impl Plan {
    fn new(options: &SearchOptions, config: &EngineConfig) -> Result<Self> {
        let limit = match options.limit {
            Some(0) => {
                return Err(Error::InvalidConfig(
                    "limit must be greater than 0".to_string(),
                ))
            }
            Some(n) => n.min(config.max_limit),
            None => config.default_limit,
        };

        let weights = match options.weights {
            Some(w) => {
                w.validate()?;
                w
            }
            None => config.weights,
        };

        let filters = options
            .filters
            .iter()
            .map(FilterSpec::bounds)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            limit,
            weights,
            require_hard: options.require_all_hard_constraints,
            filters,
        })
    }
}

fn run(
    snapshot: &CatalogSnapshot,
    config: &EngineConfig,
    raw: &str,
    options: &SearchOptions,
) -> Result<SearchResponse> {
    let start = Instant::now();
    let plan = Plan::new(options, config)?;
    let mut query = interpret(raw)?;

    for (attribute, bounds) in plan.filters {
        for (cmp, value) in bounds {
            add_bound(&mut query, attribute, cmp, value);
        }
    }

    let scorer = Scorer::new(plan.weights).hard_as_soft(!plan.require_hard);
    let scored = scorer.score_all(snapshot.as_slice(), &query);
    let response = assemble(rank(scored, query, plan.limit, plan.require_hard));

    debug!(
        query = raw,
        catalog_version = snapshot.version(),
        results = response.results.len(),
        total_candidates = response.total_candidates,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Search complete"
    );

    Ok(response)
}

/// Search `catalog` with the default engine configuration
pub fn search(catalog: &Catalog, raw: &str, options: &SearchOptions) -> Result<SearchResponse> {
    run(&catalog.all(), &EngineConfig::default(), raw, options)
}

/// Product matching engine over a swappable catalog
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over an existing, possibly shared, catalog
    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(catalog: Arc<Catalog>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the catalog, rejecting invalid records individually
    pub fn load_catalog(&self, records: Vec<Value>) -> Result<LoadReport> {
        self.catalog.load_json(records, LoadMode::Lenient)
    }

    pub fn load_catalog_with(&self, records: Vec<Value>, mode: LoadMode) -> Result<LoadReport> {
        self.catalog.load_json(records, mode)
    }

    /// Run one search against the current snapshot. A concurrent reload does
    /// not affect a search in progress.
    pub fn search(&self, raw: &str, options: &SearchOptions) -> Result<SearchResponse> {
        run(&self.catalog.all(), &self.config, raw, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> SearchEngine {
        let engine = SearchEngine::new();
        engine
            .load_catalog(vec![
                json!({"id": "a", "name": "ASUS ROG Strix G16", "category": "Gaming Laptop",
                       "price": 140640, "ram": "16GB", "rating": 4.8, "reviews": 320}),
                json!({"id": "b", "name": "HP Pavilion Aero 13", "category": "Ultrabook",
                       "price": 74999, "mrp": 89999, "ram": 16, "rating": 4.5, "reviews": 210}),
            ])
            .unwrap();
        engine
    }

    #[test]
    fn test_bad_options_fail_before_interpretation() {
        let engine = engine();
        let err = engine.search("", &SearchOptions::default().with_limit(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let bad = ScoreWeights {
            keyword: 0.9,
            category: 0.9,
            constraints: 0.0,
            quality: 0.0,
        };
        let err = engine
            .search("laptop", &SearchOptions::default().with_weights(bad))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_query() {
        let err = engine().search("  ", &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));
        assert_eq!(err.to_string(), "enter a query");
    }

    #[test]
    fn test_limit_capped() {
        let engine = engine();
        let response = engine
            .search("laptop", &SearchOptions::default().with_limit(5000))
            .unwrap();
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_filters_become_hard_constraints() {
        let engine = engine();
        let options = SearchOptions::default().with_filter(FilterSpec::new("price", None, Some(100000.0)));
        let response = engine.search("laptop", &options).unwrap();

        assert_eq!(response.total_candidates, 1);
        assert_eq!(response.results[0].product_id.as_str(), "b");
        assert_eq!(response.disqualified[0].product_id.as_str(), "a");
    }

    #[test]
    fn test_malformed_filters() {
        let engine = engine();
        for filter in [
            FilterSpec::new("colour", Some(1.0), None),
            FilterSpec::new("price", None, None),
            FilterSpec::new("price", Some(10.0), Some(5.0)),
        ] {
            let options = SearchOptions::default().with_filter(filter);
            assert!(matches!(
                engine.search("laptop", &options),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_soft_constraints_keep_everything() {
        let engine = engine();
        let options = SearchOptions::default().soft_constraints();
        let response = engine.search("laptop with at least 32GB ram", &options).unwrap();
        assert_eq!(response.total_candidates, 2);
        assert!(response.disqualified.is_empty());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SearchOptions = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert_eq!(options.limit, Some(3));
        assert!(options.require_all_hard_constraints);
        assert!(options.filters.is_empty());
    }

    #[test]
    fn test_invalid_engine_config() {
        let config = EngineConfig {
            default_limit: 0,
            ..Default::default()
        };
        assert!(SearchEngine::with_config(Arc::new(Catalog::new()), config).is_err());
    }

    #[test]
    fn test_free_function_search() {
        let engine = engine();
        let response = search(engine.catalog(), "ultrabook", &SearchOptions::default()).unwrap();
        assert_eq!(response.results[0].product_id.as_str(), "b");
    }
}
