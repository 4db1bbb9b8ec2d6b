//! # shopmatch Matching
//!
//! Free-text product matching over a [`shopmatch_core::Catalog`].
//!
//! A search runs in four steps:
//!
//! 1. [`interpret`] - raw text to a [`StructuredQuery`] (terms, category,
//!    hard constraints, hints)
//! 2. [`Scorer`] - per-product sub-scores combined with [`ScoreWeights`]
//! 3. [`rank`] - hard-constraint filter, total ordering, truncation
//! 4. [`assemble`] - serializable [`SearchResponse`] with explanations
//!
//! ## Example
//!
//! ```rust
//! use shopmatch_matching::{SearchEngine, SearchOptions};
//! use serde_json::json;
//!
//! let engine = SearchEngine::new();
//! engine
//!     .load_catalog(vec![
//!         json!({"id": "a", "name": "ASUS ROG Strix G16", "category": "Gaming Laptop",
//!                "price": 140640, "ram": "16GB", "rating": 4.8}),
//!         json!({"id": "b", "name": "HP Pavilion Aero 13", "category": "Ultrabook",
//!                "price": 74999, "ram": "16GB", "rating": 4.5}),
//!     ])
//!     .unwrap();
//!
//! let response = engine
//!     .search("gaming laptop under 150000", &SearchOptions::default())
//!     .unwrap();
//! assert_eq!(response.results[0].product_id.as_str(), "a");
//! ```

pub mod engine;
pub mod explain;
pub mod interpret;
pub mod query;
pub mod rank;
pub mod rules;
pub mod scorer;
pub mod subscore;
pub mod tokenizer;
pub mod weights;

pub use engine::{search, EngineConfig, FilterSpec, SearchEngine, SearchOptions};
pub use explain::{assemble, Factor, ResultEntry, SearchResponse, SearchStats};
pub use interpret::interpret;
pub use query::{CategoryHint, HintTag, Preference, PreferenceKind, StructuredQuery};
pub use rank::{rank, Disqualified, ResultSet};
pub use scorer::{ScoredCandidate, Scorer};
pub use weights::{Component, ScoreWeights};

pub use shopmatch_core::{Error, Result};
