// Numeric bounds and constraint evaluation against products
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attribute::NumericAttribute;
use crate::product::Product;

/// Comparison operator produced by a query phrase or a filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    AtMost,
    LessThan,
    AtLeast,
    GreaterThan,
}

impl Comparison {
    fn is_upper(&self) -> bool {
        matches!(self, Comparison::AtMost | Comparison::LessThan)
    }

    fn is_inclusive(&self) -> bool {
        matches!(self, Comparison::AtMost | Comparison::AtLeast)
    }
}

/// One end of a [`Range`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub value: f64,
    pub inclusive: bool,
}

impl Limit {
    /// `≤ 800`, `> 4.5`; `upper` says which end of a range this is
    pub fn describe(&self, upper: bool) -> String {
        let symbol = match (upper, self.inclusive) {
            (true, true) => "≤",
            (true, false) => "<",
            (false, true) => "≥",
            (false, false) => ">",
        };
        format!("{} {}", symbol, fmt_value(self.value))
    }
}

/// Interval over a numeric attribute, open on any missing side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Limit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Limit>,
}

/// What happened when a bound was merged into a [`Range`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Merge {
    Added,
    /// A bound on the same side was replaced
    Replaced(Limit),
    /// The opposite bound contradicted the new one and was dropped
    Contradicted(Limit),
}

impl Range {
    pub fn from_comparison(cmp: Comparison, value: f64) -> Self {
        let mut range = Range::default();
        range.apply(cmp, value);
        range
    }

    /// Merge a bound into the range. The newer bound always wins.
    pub fn apply(&mut self, cmp: Comparison, value: f64) -> Merge {
        let limit = Limit {
            value,
            inclusive: cmp.is_inclusive(),
        };

        let (same, opposite) = if cmp.is_upper() {
            (&mut self.max, &mut self.min)
        } else {
            (&mut self.min, &mut self.max)
        };
        let previous = same.replace(limit);

        if let Some(other) = *opposite {
            let (lo, hi) = if cmp.is_upper() { (other, limit) } else { (limit, other) };
            if Self::bounds_conflict(lo, hi) {
                *opposite = None;
                return Merge::Contradicted(other);
            }
        }

        match previous {
            Some(prev) => Merge::Replaced(prev),
            None => Merge::Added,
        }
    }

    fn bounds_conflict(lo: Limit, hi: Limit) -> bool {
        if lo.value > hi.value {
            return true;
        }
        lo.value == hi.value && !(lo.inclusive && hi.inclusive)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Some(l) if l.inclusive => value >= l.value,
            Some(l) => value > l.value,
            None => true,
        };
        let below_max = match self.max {
            Some(l) if l.inclusive => value <= l.value,
            Some(l) => value < l.value,
            None => true,
        };
        above_min && below_max
    }

    /// Graded satisfaction in `[0, 1]`: 1.0 inside the range, falling off
    /// proportionally with the distance from the violated bound.
    pub fn closeness(&self, value: f64) -> f64 {
        if self.contains(value) {
            return 1.0;
        }
        let mut score: f64 = 1.0;
        if let Some(min) = self.min {
            if value < min.value || (value == min.value && !min.inclusive) {
                score = score.min(if min.value > 0.0 { value / min.value } else { 0.0 });
            }
        }
        if let Some(max) = self.max {
            if value > max.value || (value == max.value && !max.inclusive) {
                score = score.min(if value > 0.0 { max.value / value } else { 0.0 });
            }
        }
        score.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (Some(lo), Some(hi)) => write!(f, "{} and {}", lo.describe(false), hi.describe(true)),
            (Some(lo), None) => f.write_str(&lo.describe(false)),
            (None, Some(hi)) => f.write_str(&hi.describe(true)),
            (None, None) => f.write_str("any"),
        }
    }
}

pub fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Result of checking one constraint against one product
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Satisfied,
    Violated(f64),
    /// The product does not carry the attribute
    Unknown,
}

/// A bound on a single numeric attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub attribute: NumericAttribute,
    pub range: Range,
}

impl Constraint {
    pub fn new(attribute: NumericAttribute, range: Range) -> Self {
        Self { attribute, range }
    }

    pub fn check(&self, product: &Product) -> Outcome {
        match self.attribute.value_of(product) {
            Some(v) if self.range.contains(v) => Outcome::Satisfied,
            Some(v) => Outcome::Violated(v),
            None => Outcome::Unknown,
        }
    }

    /// Human-readable reason for a failed check, `None` when satisfied
    pub fn failure_reason(&self, product: &Product) -> Option<String> {
        match self.check(product) {
            Outcome::Satisfied => None,
            Outcome::Violated(v) => Some(format!(
                "{} {} does not satisfy {}",
                self.attribute,
                fmt_value(v),
                self.range
            )),
            Outcome::Unknown => Some(format!("{} unknown", self.attribute)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.range)?;
        let unit = self.attribute.unit();
        if !unit.is_empty() {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}
