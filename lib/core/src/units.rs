//! Unit normalization for numeric product specs
//!
//! Every numeric spec is stored in one canonical unit per dimension:
//! gigabytes for data sizes, inches for lengths and kilograms for mass.
//! Storage follows retail convention, so 1 TB is 1000 GB.

use serde::{Deserialize, Serialize};

/// Physical dimension of a numeric spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Data,
    Length,
    Mass,
}

/// A unit recognised in catalog values and in query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Megabyte,
    Gigabyte,
    Terabyte,
    Inch,
    Centimeter,
    Kilogram,
    Gram,
    Pound,
}

impl Unit {
    /// Look up a unit by its (lowercase) spelling
    pub fn parse(s: &str) -> Option<Unit> {
        let unit = match s {
            "mb" | "megabyte" | "megabytes" => Unit::Megabyte,
            "gb" | "gig" | "gigs" | "gigabyte" | "gigabytes" => Unit::Gigabyte,
            "tb" | "terabyte" | "terabytes" => Unit::Terabyte,
            "in" | "inch" | "inches" | "\"" | "''" => Unit::Inch,
            "cm" | "centimeter" | "centimeters" => Unit::Centimeter,
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Unit::Kilogram,
            "g" | "gram" | "grams" => Unit::Gram,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            _ => return None,
        };
        Some(unit)
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Megabyte | Unit::Gigabyte | Unit::Terabyte => Dimension::Data,
            Unit::Inch | Unit::Centimeter => Dimension::Length,
            Unit::Kilogram | Unit::Gram | Unit::Pound => Dimension::Mass,
        }
    }

    /// Convert a value in this unit to the canonical unit of its dimension
    pub fn to_canonical(&self, value: f64) -> f64 {
        match self {
            Unit::Megabyte => value / 1000.0,
            Unit::Gigabyte => value,
            Unit::Terabyte => value * 1000.0,
            Unit::Inch => value,
            Unit::Centimeter => value / 2.54,
            Unit::Kilogram => value,
            Unit::Gram => value / 1000.0,
            Unit::Pound => value * 0.453_592_37,
        }
    }
}

/// Split a token such as `32gb`, `13.3''` or `1,000` into its number and
/// the (possibly empty) remainder.
///
/// Returns `None` when the token does not start with a number.
pub fn split_quantity(token: &str) -> Option<(f64, &str)> {
    let end = token
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map(|(i, _)| i)
        .unwrap_or(token.len());

    let digits: String = token[..end].chars().filter(|c| *c != ',').collect();
    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value: f64 = digits.trim_end_matches('.').parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value, &token[end..]))
}

/// Parse a catalog quantity like `"16GB"`, `"1 TB"`, `"13.3 Inches"` into
/// the canonical unit of `dimension`.
///
/// A bare number is taken to be in canonical units already.
pub fn parse_quantity(text: &str, dimension: Dimension) -> Option<f64> {
    let text = text.trim().to_lowercase();
    let (value, rest) = split_quantity(&text)?;
    let rest = rest.trim();

    if rest.is_empty() {
        return Some(value);
    }

    // "16 GB RAM" style suffixes: only the first word is the unit
    let unit_word = rest.split_whitespace().next().unwrap_or(rest);
    let unit = Unit::parse(unit_word)?;
    if unit.dimension() != dimension {
        return None;
    }
    Some(unit.to_canonical(value))
}
