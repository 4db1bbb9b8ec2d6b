use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ValidationError;
use crate::units::{parse_quantity, Dimension};

/// Stable, unique product identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// List and selling price in one fixed currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub list: u64,
    pub selling: u64,
}

impl Price {
    /// Discount of the selling price against the list price, in percent,
    /// rounded to one decimal place.
    pub fn discount_percent(&self) -> f64 {
        if self.list == 0 || self.selling >= self.list {
            return 0.0;
        }
        let pct = (self.list - self.selling) as f64 / self.list as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Numeric specs in canonical units (GB, inches, kg)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_inches: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// One validated catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub series: Option<String>,
    pub numeric: NumericSpecs,
    pub text: TextSpecs,
    pub price: Price,
    pub rating: f64,
    pub review_count: u64,
}

impl Product {
    /// Minimal valid product; the remaining fields start empty.
    pub fn new(id: impl Into<String>, name: &str, category: &str, selling_price: u64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            brand: None,
            series: None,
            numeric: NumericSpecs::default(),
            text: TextSpecs::default(),
            price: Price {
                list: selling_price,
                selling: selling_price,
            },
            rating: 0.0,
            review_count: 0,
        }
    }

    pub fn discount_percent(&self) -> f64 {
        self.price.discount_percent()
    }

    /// All descriptive text of the product, lowercased, for keyword matching.
    ///
    /// Numeric specs are rendered the way shoppers type them (`16gb`,
    /// `16 gb`, `13.3 inch`).
    pub fn search_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.name.clone(), self.category.clone()];
        parts.extend(self.brand.iter().cloned());
        parts.extend(self.series.iter().cloned());

        let text = &self.text;
        for value in [
            &text.processor,
            &text.graphics,
            &text.operating_system,
            &text.color,
            &text.resolution,
        ]
        .into_iter()
        .flatten()
        {
            parts.push(value.clone());
        }

        for gb in [self.numeric.memory_gb, self.numeric.storage_gb].into_iter().flatten() {
            parts.push(format!("{}gb {} gb", fmt_num(gb), fmt_num(gb)));
            if gb >= 1000.0 && gb % 1000.0 == 0.0 {
                let tb = fmt_num(gb / 1000.0);
                parts.push(format!("{tb}tb {tb} tb"));
            }
        }
        if let Some(inches) = self.numeric.screen_inches {
            parts.push(format!("{} inch", fmt_num(inches)));
        }

        parts.join(" | ").to_lowercase()
    }

    /// Check the product invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::Missing("id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::Missing("category"));
        }
        if self.price.selling > self.price.list {
            return Err(ValidationError::SellingAboveList);
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// A numeric spec as it appears in input: a number already in canonical
/// units, or a string carrying its own unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Number(f64),
    Text(String),
}

impl QuantityValue {
    fn normalize(&self, field: &'static str, dimension: Dimension) -> Result<f64, ValidationError> {
        let parsed = match self {
            QuantityValue::Number(n) => Some(*n),
            QuantityValue::Text(s) => parse_quantity(s, dimension),
        };
        match parsed {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(ValidationError::InvalidQuantity {
                field,
                value: match self {
                    QuantityValue::Number(n) => n.to_string(),
                    QuantityValue::Text(s) => s.clone(),
                },
            }),
        }
    }
}

/// Identifier as it appears in input; numbers are accepted and stringified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Integer(u64),
}

/// Lenient catalog input record
///
/// Every field is optional so that a malformed record can still be read and
/// reported with a precise reason. Aliases accept the key names used by
/// the storefront's product feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "product_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "form_factor", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, alias = "ram", alias = "ram_gb", skip_serializing_if = "Option::is_none")]
    pub memory: Option<QuantityValue>,
    #[serde(default, alias = "storage_gb", skip_serializing_if = "Option::is_none")]
    pub storage: Option<QuantityValue>,
    #[serde(
        default,
        alias = "screen_size",
        alias = "standing_screen_display_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub screen: Option<QuantityValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<QuantityValue>,
    #[serde(default, alias = "processor_type", skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, alias = "graphics_coprocessor", skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(default, alias = "operating_system", skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, alias = "colour", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "screen_resolution", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(
        default,
        alias = "mrp",
        alias = "list_price",
        alias = "originalPrice",
        skip_serializing_if = "Option::is_none"
    )]
    pub list_price: Option<i64>,
    #[serde(default, alias = "selling_price", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        default,
        alias = "reviews",
        alias = "reviews_count",
        alias = "review_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<i64>,
}

impl ProductRecord {
    /// Read a record out of an arbitrary JSON value
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::Malformed("expected a JSON object".to_string()));
        }
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Validate the record and convert it into a [`Product`].
    ///
    /// The first violated invariant becomes the rejection reason.
    pub fn into_product(self) -> Result<Product, ValidationError> {
        let id = match self.id {
            Some(RecordId::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(RecordId::Integer(i)) => i.to_string(),
            _ => return Err(ValidationError::Missing("id")),
        };
        let name = non_empty(self.name).ok_or(ValidationError::Missing("name"))?;
        let category = non_empty(self.category).ok_or(ValidationError::Missing("category"))?;

        let selling = self.price.ok_or(ValidationError::Missing("price"))?;
        if selling < 0 {
            return Err(ValidationError::Negative("selling price"));
        }
        let list = self.list_price.unwrap_or(selling);
        if list < 0 {
            return Err(ValidationError::Negative("list price"));
        }
        if selling > list {
            return Err(ValidationError::SellingAboveList);
        }

        let rating = self.rating.unwrap_or(0.0);
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        let review_count = self.review_count.unwrap_or(0);
        if review_count < 0 {
            return Err(ValidationError::Negative("review count"));
        }

        let numeric = NumericSpecs {
            memory_gb: normalize_opt(&self.memory, "memory", Dimension::Data)?,
            storage_gb: normalize_opt(&self.storage, "storage", Dimension::Data)?,
            screen_inches: normalize_opt(&self.screen, "screen", Dimension::Length)?,
            weight_kg: normalize_opt(&self.weight, "weight", Dimension::Mass)?,
        };

        Ok(Product {
            id: ProductId::new(id),
            name,
            category,
            brand: non_empty(self.brand),
            series: non_empty(self.series),
            numeric,
            text: TextSpecs {
                processor: non_empty(self.processor),
                graphics: non_empty(self.graphics),
                operating_system: non_empty(self.os),
                color: non_empty(self.color),
                resolution: non_empty(self.resolution),
            },
            price: Price {
                list: list as u64,
                selling: selling as u64,
            },
            rating,
            review_count: review_count as u64,
        })
    }
}

impl From<&Product> for ProductRecord {
    fn from(p: &Product) -> Self {
        Self {
            id: Some(RecordId::Text(p.id.to_string())),
            name: Some(p.name.clone()),
            category: Some(p.category.clone()),
            brand: p.brand.clone(),
            series: p.series.clone(),
            memory: p.numeric.memory_gb.map(QuantityValue::Number),
            storage: p.numeric.storage_gb.map(QuantityValue::Number),
            screen: p.numeric.screen_inches.map(QuantityValue::Number),
            weight: p.numeric.weight_kg.map(QuantityValue::Number),
            processor: p.text.processor.clone(),
            graphics: p.text.graphics.clone(),
            os: p.text.operating_system.clone(),
            color: p.text.color.clone(),
            resolution: p.text.resolution.clone(),
            list_price: Some(p.price.list as i64),
            price: Some(p.price.selling as i64),
            rating: Some(p.rating),
            review_count: Some(p.review_count as i64),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn normalize_opt(
    value: &Option<QuantityValue>,
    field: &'static str,
    dimension: Dimension,
) -> Result<Option<f64>, ValidationError> {
    value
        .as_ref()
        .map(|q| q.normalize(field, dimension))
        .transpose()
}
