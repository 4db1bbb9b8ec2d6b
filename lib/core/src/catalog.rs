use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, ValidationError};
use crate::product::{Product, ProductId, ProductRecord};

/// How a catalog load treats invalid records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Reject invalid records individually and install the rest
    #[default]
    Lenient,
    /// Any invalid record fails the whole load
    Strict,
}

/// A record refused by a catalog load, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub record: Value,
    pub reason: String,
}

/// Outcome of a catalog load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
}

/// Immutable point-in-time view of the catalog
///
/// Searches hold an `Arc` to the snapshot they started with, so a reload
/// never changes what an in-flight request sees.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    version: u64,
    products: Vec<Product>,
    index: AHashMap<ProductId, usize>,
}

impl CatalogSnapshot {
    fn new(version: u64, products: Vec<Product>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self {
            version,
            products,
            index,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate products in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index
            .get(&ProductId::new(id))
            .map(|&i| &self.products[i])
    }

    pub fn stats(&self) -> CatalogStats {
        let mut categories: BTreeMap<String, usize> = BTreeMap::new();
        for p in &self.products {
            *categories.entry(p.category.clone()).or_insert(0) += 1;
        }
        let prices = self.products.iter().map(|p| p.price.selling);
        CatalogStats {
            version: self.version,
            products: self.products.len(),
            categories,
            min_price: prices.clone().min(),
            max_price: prices.max(),
        }
    }
}

impl<'a> IntoIterator for &'a CatalogSnapshot {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Summary of a snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub version: u64,
    pub products: usize,
    pub categories: BTreeMap<String, usize>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

/// The searchable product catalog
///
/// Holds the active snapshot behind a lock that is only taken to clone or
/// swap the `Arc`; products are never mutated in place.
#[derive(Debug)]
pub struct Catalog {
    snapshot: RwLock<Arc<CatalogSnapshot>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// Current snapshot; cheap, never copies products
    pub fn all(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.read().version()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.snapshot.read().get(id).cloned()
    }

    /// Replace the catalog with `records`.
    ///
    /// In [`LoadMode::Lenient`] invalid records are reported in the returned
    /// [`LoadReport`] and everything else is installed. In
    /// [`LoadMode::Strict`] any rejection returns [`Error::StrictLoad`] and
    /// the previous snapshot stays active.
    pub fn load(&self, records: Vec<ProductRecord>, mode: LoadMode) -> Result<LoadReport> {
        let checked = records
            .into_iter()
            .map(|r| {
                let json = r.to_json();
                (json, r.into_product())
            })
            .collect();
        self.install(checked, mode)
    }

    /// Replace the catalog from raw JSON values.
    ///
    /// Values that are not readable as a product record are rejected with a
    /// `malformed record` reason.
    pub fn load_json(&self, values: Vec<Value>, mode: LoadMode) -> Result<LoadReport> {
        let checked = values
            .into_iter()
            .map(|v| {
                let product = ProductRecord::from_json(&v).and_then(ProductRecord::into_product);
                (v, product)
            })
            .collect();
        self.install(checked, mode)
    }

    /// Replace the catalog with already-built products
    pub fn load_products(&self, products: Vec<Product>, mode: LoadMode) -> Result<LoadReport> {
        let checked = products
            .into_iter()
            .map(|p| {
                let json = ProductRecord::from(&p).to_json();
                let product = p.validate().map(|_| p);
                (json, product)
            })
            .collect();
        self.install(checked, mode)
    }

    fn install(
        &self,
        checked: Vec<(Value, std::result::Result<Product, ValidationError>)>,
        mode: LoadMode,
    ) -> Result<LoadReport> {
        let mut seen: AHashSet<ProductId> = AHashSet::new();
        let mut products = Vec::with_capacity(checked.len());
        let mut rejected = Vec::new();

        for (record, outcome) in checked {
            let outcome = outcome.and_then(|p| {
                if seen.insert(p.id.clone()) {
                    Ok(p)
                } else {
                    Err(ValidationError::DuplicateId(p.id.to_string()))
                }
            });
            match outcome {
                Ok(p) => products.push(p),
                Err(e) => {
                    warn!(reason = %e, "Rejected catalog record");
                    rejected.push(RejectedRecord {
                        record,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if mode == LoadMode::Strict && !rejected.is_empty() {
            let first = rejected[0].reason.clone();
            debug!(count = rejected.len(), "Strict load aborted, keeping previous catalog");
            return Err(Error::StrictLoad {
                count: rejected.len(),
                first,
                rejected,
            });
        }

        let accepted = products.len();
        // index is built before taking the lock
        let mut next = CatalogSnapshot::new(0, products);
        {
            let mut current = self.snapshot.write();
            next.version = current.version() + 1;
            *current = Arc::new(next);
        }

        info!(
            accepted,
            rejected = rejected.len(),
            version = self.version(),
            "Catalog snapshot installed"
        );

        Ok(LoadReport { accepted, rejected })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
