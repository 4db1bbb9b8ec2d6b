//! # shopmatch
//!
//! Free-text product matching: type what you want, get the catalog products
//! that fit it best, each with a 0-100 match score and the reasons behind it.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! shopmatch search --catalog data/catalog.json "gaming laptop under 150000"
//! shopmatch validate --catalog data/catalog.json --strict
//! shopmatch stats --catalog data/catalog.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use shopmatch::prelude::*;
//! use serde_json::json;
//!
//! let engine = SearchEngine::new();
//! let report = engine
//!     .load_catalog(vec![
//!         json!({"id": "b", "name": "HP Pavilion Aero 13", "category": "Ultrabook",
//!                "price": 74999, "mrp": 89999, "rating": 4.5}),
//!         json!({"id": "x", "category": "Ultrabook", "price": 1}),
//!     ])
//!     .unwrap();
//! assert_eq!(report.accepted, 1);
//!
//! let response = engine.search("budget ultrabook", &SearchOptions::default()).unwrap();
//! assert_eq!(response.results[0].name, "HP Pavilion Aero 13");
//! ```
//!
//! ## Crate Structure
//!
//! - `shopmatch-core` - Product model, unit normalization, constraints, catalog snapshots
//! - `shopmatch-matching` - Query interpretation, scoring, ranking, explanations

pub mod io;

// Re-export core types
pub use shopmatch_core::{
    Catalog, CatalogSnapshot, CatalogStats, Comparison, Constraint, Error, LoadMode, LoadReport,
    NumericAttribute, Product, ProductId, ProductRecord, Range, RejectedRecord, Result,
    TextAttribute, ValidationError,
};

// Re-export matching
pub use shopmatch_matching::{
    interpret, search, Component, EngineConfig, FilterSpec, ResultEntry, ScoreWeights,
    SearchEngine, SearchOptions, SearchResponse, StructuredQuery,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, EngineConfig, Error, FilterSpec, LoadMode, LoadReport, Product, Result,
        ScoreWeights, SearchEngine, SearchOptions, SearchResponse, StructuredQuery,
    };
}
