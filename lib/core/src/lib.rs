//! # shopmatch Core
//!
//! Core library for the shopmatch product matching engine.
//!
//! This crate provides the catalog side of the engine:
//!
//! - [`Product`] - A validated catalog entry with normalized specs
//! - [`ProductRecord`] - Lenient input shape accepted by catalog loads
//! - [`Catalog`] - Atomically swappable catalog snapshots
//! - [`Constraint`] - A numeric bound checked against products
//!
//! ## Example
//!
//! ```rust
//! use shopmatch_core::{Catalog, LoadMode};
//! use serde_json::json;
//!
//! let catalog = Catalog::new();
//! let report = catalog
//!     .load_json(
//!         vec![
//!             json!({"id": "a", "name": "HP Pavilion Aero 13", "category": "Ultrabook", "price": 74999}),
//!             json!({"id": "b", "category": "Ultrabook", "price": 1}),
//!         ],
//!         LoadMode::Lenient,
//!     )
//!     .unwrap();
//!
//! assert_eq!(report.accepted, 1);
//! assert_eq!(report.rejected[0].reason, "missing name");
//!
//! let snapshot = catalog.all();
//! assert_eq!(snapshot.iter().count(), 1);
//! ```

pub mod attribute;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod product;
pub mod units;

pub use attribute::{NumericAttribute, TextAttribute};
pub use catalog::{Catalog, CatalogSnapshot, CatalogStats, LoadMode, LoadReport, RejectedRecord};
pub use error::{Error, Result, ValidationError};
pub use filter::{Comparison, Constraint, Limit, Merge, Outcome, Range};
pub use product::{
    NumericSpecs, Price, Product, ProductId, ProductRecord, QuantityValue, RecordId, TextSpecs,
};
pub use units::{Dimension, Unit};
