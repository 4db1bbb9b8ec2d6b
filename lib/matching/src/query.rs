//! Structured query produced by the interpreter

use serde::Serialize;
use shopmatch_core::{Constraint, NumericAttribute, Range, TextAttribute};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Canonical category the query asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHint {
    pub name: String,
    pub family: String,
}

/// Qualitative intent read from words like "budget" or "gaming"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintTag {
    PerformanceOriented,
    Creator,
    Budget,
    Portable,
    Premium,
}

impl HintTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintTag::PerformanceOriented => "performance-oriented",
            HintTag::Creator => "creator",
            HintTag::Budget => "budget",
            HintTag::Portable => "portable",
            HintTag::Premium => "premium",
        }
    }
}

impl fmt::Display for HintTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a soft preference asks of a product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreferenceKind {
    /// Graded numeric bound
    Numeric {
        attribute: NumericAttribute,
        range: Range,
    },
    /// Satisfied when the attribute contains any of the patterns
    #[serde(rename_all = "camelCase")]
    Text {
        attribute: TextAttribute,
        any_of: &'static [&'static str],
    },
}

/// A soft preference raised by a hint. Never disqualifies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preference {
    pub tag: HintTag,
    pub weight: f64,
    #[serde(flatten)]
    pub kind: PreferenceKind,
}

impl Preference {
    pub fn numeric(tag: HintTag, weight: f64, constraint: Constraint) -> Self {
        Self {
            tag,
            weight,
            kind: PreferenceKind::Numeric {
                attribute: constraint.attribute,
                range: constraint.range,
            },
        }
    }

    pub fn text(
        tag: HintTag,
        weight: f64,
        attribute: TextAttribute,
        any_of: &'static [&'static str],
    ) -> Self {
        Self {
            tag,
            weight,
            kind: PreferenceKind::Text { attribute, any_of },
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PreferenceKind::Numeric { attribute, range } => {
                write!(f, "{}", Constraint::new(*attribute, *range))
            }
            PreferenceKind::Text { attribute, .. } => match (self.tag, attribute) {
                (_, TextAttribute::Graphics) => f.write_str("dedicated graphics"),
                (_, TextAttribute::Processor) => f.write_str("high-tier processor"),
                (_, attr) => write!(f, "preferred {}", attr),
            },
        }
    }
}

/// Interpretation of a raw query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub raw: String,
    /// Keyword terms in input order, deduplicated
    pub terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryHint>,
    /// Hard constraints, at most one range per attribute
    pub constraints: BTreeMap<NumericAttribute, Range>,
    pub hints: BTreeSet<HintTag>,
    pub preferences: Vec<Preference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl StructuredQuery {
    /// Hard constraints in attribute order
    pub fn hard_constraints(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.constraints
            .iter()
            .map(|(attr, range)| Constraint::new(*attr, *range))
    }

    pub fn has_hint(&self, tag: HintTag) -> bool {
        self.hints.contains(&tag)
    }

    /// Weight of a hard constraint inside the constraint sub-score
    pub fn hard_weight(&self, attribute: NumericAttribute) -> f64 {
        if attribute == NumericAttribute::Price && self.has_hint(HintTag::Budget) {
            0.5
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopmatch_core::Comparison;

    #[test]
    fn test_hint_tags_serialize_kebab_case() {
        let json = serde_json::to_string(&HintTag::PerformanceOriented).unwrap();
        assert_eq!(json, "\"performance-oriented\"");
        assert_eq!(HintTag::Budget.to_string(), "budget");
    }

    #[test]
    fn test_budget_lowers_price_weight() {
        let mut q = StructuredQuery::default();
        assert_eq!(q.hard_weight(NumericAttribute::Price), 1.0);
        q.hints.insert(HintTag::Budget);
        assert_eq!(q.hard_weight(NumericAttribute::Price), 0.5);
        assert_eq!(q.hard_weight(NumericAttribute::Memory), 1.0);
    }

    #[test]
    fn test_preference_display() {
        let p = Preference::numeric(
            HintTag::Portable,
            0.5,
            Constraint::new(
                NumericAttribute::Weight,
                Range::from_comparison(Comparison::AtMost, 1.5),
            ),
        );
        assert_eq!(p.to_string(), "weight ≤ 1.5 kg");

        let g = Preference::text(HintTag::Creator, 0.5, TextAttribute::Graphics, &["rtx"]);
        assert_eq!(g.to_string(), "dedicated graphics");
    }
}
