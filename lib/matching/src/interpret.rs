//! Query interpretation
//!
//! Turns free text into a [`StructuredQuery`] in three passes over the
//! token stream:
//!
//! 1. comparison phrases followed by a quantity become hard constraints
//! 2. hint and category phrases are looked up in the rule tables
//! 3. whatever is left, minus stop words, becomes keyword terms
//!
//! Interpretation is a pure function of the input text.

use shopmatch_core::units::split_quantity;
use shopmatch_core::{
    Comparison, Constraint, Dimension, Error, Merge, NumericAttribute, Range, Result,
    TextAttribute, Unit,
};
use tracing::debug;

use crate::query::{CategoryHint, HintTag, Preference, StructuredQuery};
use crate::rules::{
    is_stop_word, match_attribute_noun, match_category, match_comparison, match_hint, RuleKind,
    CURRENCY_MARKERS, DEDICATED_GRAPHICS, HIGH_TIER_PROCESSORS, MEMORY_GUESS_MAX_GB,
    RANGE_JOINERS, RATING_MARKERS,
};
use crate::tokenizer::tokenize;

/// Interpret a raw query
pub fn interpret(raw: &str) -> Result<StructuredQuery> {
    if raw.trim().is_empty() {
        return Err(Error::EmptyQuery);
    }

    let tokens = tokenize(raw);
    let mut query = StructuredQuery {
        raw: raw.to_string(),
        ..Default::default()
    };

    let remaining = extract_constraints(&tokens, &mut query);
    extract_terms(&remaining, &mut query);

    if query.terms.is_empty() {
        query
            .terms
            .push(raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase());
    }

    let hints: Vec<HintTag> = query.hints.iter().copied().collect();
    for tag in hints {
        query.preferences.extend(expand_hint(tag));
    }

    debug!(
        raw = %query.raw,
        terms = ?query.terms,
        constraints = query.constraints.len(),
        hints = query.hints.len(),
        "Interpreted query"
    );

    Ok(query)
}

/// What a quantity says about the attribute it measures
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    Currency,
    Unit(Unit),
    Percent,
    Stars,
    Plain,
}

impl Cue {
    fn accepts(&self, noun: NumericAttribute) -> bool {
        match self {
            Cue::Currency => noun == NumericAttribute::Price,
            Cue::Percent => noun == NumericAttribute::Discount,
            Cue::Stars => noun == NumericAttribute::Rating,
            Cue::Unit(unit) => match unit.dimension() {
                Dimension::Data => {
                    matches!(noun, NumericAttribute::Memory | NumericAttribute::Storage)
                }
                Dimension::Length => noun == NumericAttribute::ScreenSize,
                Dimension::Mass => noun == NumericAttribute::Weight,
            },
            Cue::Plain => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Quantity {
    value: f64,
    cue: Cue,
    /// Attribute noun directly after the quantity
    noun: Option<NumericAttribute>,
    /// Index of the first token after the quantity
    end: usize,
}

impl Quantity {
    fn has_evidence(&self) -> bool {
        self.cue != Cue::Plain || self.noun.is_some()
    }

    fn canonical(&self) -> f64 {
        match self.cue {
            Cue::Unit(unit) => unit.to_canonical(self.value),
            _ => self.value,
        }
    }
}

/// Read `[currency] number[k][unit] [unit|%|stars|currency word] [noun]`
/// starting at `at`.
fn parse_quantity(tokens: &[String], at: usize) -> Option<Quantity> {
    let mut j = at;
    let mut cue = Cue::Plain;

    if tokens.get(j).is_some_and(|t| CURRENCY_MARKERS.contains(&t.as_str())) {
        cue = Cue::Currency;
        j += 1;
    }

    let (mut value, rest) = split_quantity(tokens.get(j)?)?;
    match rest {
        "" => {}
        "k" => value *= 1000.0,
        suffix => cue = Cue::Unit(Unit::parse(suffix)?),
    }
    j += 1;

    if let Some(next) = tokens.get(j).map(String::as_str) {
        let separate_unit = match next {
            "in" | "g" if !ends_quantity(tokens, j + 1) => None,
            word => Unit::parse(word),
        };
        if cue == Cue::Plain {
            if let Some(unit) = separate_unit {
                cue = Cue::Unit(unit);
                j += 1;
            } else if next == "%" {
                cue = Cue::Percent;
                j += 1;
            } else if RATING_MARKERS.contains(&next) {
                cue = Cue::Stars;
                j += 1;
            } else if next != "$" && next != "₹" && CURRENCY_MARKERS.contains(&next) {
                cue = Cue::Currency;
                j += 1;
            }
        }
    }

    let mut noun = None;
    if let Some((attr, len)) = match_attribute_noun(tokens, j) {
        if cue.accepts(attr) {
            noun = Some(attr);
            j += len;
        }
    }

    Some(Quantity {
        value,
        cue,
        noun,
        end: j,
    })
}

/// Whether a quantity can end before `at`: `in` and `g` only read as units
/// at the end of the query or before a joiner, noun or category word.
fn ends_quantity(tokens: &[String], at: usize) -> bool {
    match tokens.get(at) {
        None => true,
        Some(next) => {
            RANGE_JOINERS.contains(&next.as_str())
                || match_attribute_noun(tokens, at).is_some()
                || match_category(tokens, at).is_some()
        }
    }
}

fn resolve_attribute(cue: Cue, value: f64, noun: Option<NumericAttribute>) -> NumericAttribute {
    match cue {
        Cue::Percent => NumericAttribute::Discount,
        Cue::Stars => NumericAttribute::Rating,
        Cue::Currency => NumericAttribute::Price,
        Cue::Unit(unit) => match unit.dimension() {
            Dimension::Data => match noun {
                Some(attr @ (NumericAttribute::Memory | NumericAttribute::Storage)) => attr,
                _ if value <= MEMORY_GUESS_MAX_GB => NumericAttribute::Memory,
                _ => NumericAttribute::Storage,
            },
            Dimension::Length => NumericAttribute::ScreenSize,
            Dimension::Mass => NumericAttribute::Weight,
        },
        Cue::Plain => noun.unwrap_or(NumericAttribute::Price),
    }
}

/// Attribute noun at the end of the already collected tokens
/// (`ram at least 16gb`), with its length. A noun right after a quantity
/// (`16gb ram`) belongs to that quantity.
fn trailing_noun(collected: &[String]) -> Option<(NumericAttribute, usize)> {
    [2, 1].into_iter().find_map(|len| {
        let start = collected.len().checked_sub(len)?;
        match match_attribute_noun(collected, start) {
            Some((attr, l)) if l == len && !follows_quantity(collected, start) => {
                Some((attr, len))
            }
            _ => None,
        }
    })
}

fn follows_quantity(tokens: &[String], at: usize) -> bool {
    let is_number = |i: usize| tokens.get(i).is_some_and(|t| split_quantity(t).is_some());
    match at.checked_sub(1) {
        Some(prev) if is_number(prev) => true,
        Some(prev) => {
            Unit::parse(&tokens[prev]).is_some() && prev.checked_sub(1).is_some_and(is_number)
        }
        None => false,
    }
}

/// First pass: pull constraint phrases out of the token stream. Returns the
/// tokens that were not part of a constraint, in order.
fn extract_constraints(tokens: &[String], query: &mut StructuredQuery) -> Vec<String> {
    let mut remaining: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let Some(rule) = match_comparison(tokens, i) else {
            remaining.push(tokens[i].clone());
            i += 1;
            continue;
        };
        let after = i + rule.phrase.len();
        let preceding = trailing_noun(&remaining);

        let parsed = match rule.kind {
            RuleKind::Bound(cmp) => parse_quantity(tokens, after).and_then(|q| {
                let noun = q.noun.or(preceding
                    .map(|(attr, _)| attr)
                    .filter(|attr| q.cue.accepts(*attr)));
                if rule.needs_evidence && !q.has_evidence() && noun.is_none() {
                    return None;
                }
                let attr = resolve_attribute(q.cue, q.canonical(), noun);
                Some((vec![(cmp, q.canonical())], attr, q.end))
            }),
            RuleKind::Between => parse_between(tokens, after, preceding.map(|(a, _)| a)),
        };

        match parsed {
            Some((bounds, attr, end)) => {
                if let Some((noun, len)) = preceding {
                    if noun == attr {
                        remaining.truncate(remaining.len() - len);
                    }
                }
                for (cmp, value) in bounds {
                    add_bound(query, attr, cmp, value);
                }
                i = end;
            }
            None => {
                remaining.push(tokens[i].clone());
                i += 1;
            }
        }
    }

    remaining
}

type Bounds = (Vec<(Comparison, f64)>, NumericAttribute, usize);

/// `between X and Y`: the cue of either side applies to both
fn parse_between(
    tokens: &[String],
    at: usize,
    preceding: Option<NumericAttribute>,
) -> Option<Bounds> {
    let low = parse_quantity(tokens, at)?;
    if !tokens
        .get(low.end)
        .is_some_and(|t| RANGE_JOINERS.contains(&t.as_str()))
    {
        return None;
    }
    let high = parse_quantity(tokens, low.end + 1)?;

    let cue = if low.cue != Cue::Plain { low.cue } else { high.cue };
    let with_cue = |q: &Quantity| Quantity { cue, ..*q }.canonical();
    let (mut lo, mut hi) = (with_cue(&low), with_cue(&high));
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }

    let noun = high
        .noun
        .or(low.noun)
        .or(preceding.filter(|attr| cue.accepts(*attr)));
    let attr = resolve_attribute(cue, hi, noun);

    Some((
        vec![(Comparison::AtLeast, lo), (Comparison::AtMost, hi)],
        attr,
        high.end,
    ))
}

pub(crate) fn add_bound(query: &mut StructuredQuery, attr: NumericAttribute, cmp: Comparison, value: f64) {
    let upper = matches!(cmp, Comparison::AtMost | Comparison::LessThan);
    let range = query.constraints.entry(attr).or_default();
    let merge = range.apply(cmp, value);
    let new = Range::from_comparison(cmp, value).to_string();

    match merge {
        Merge::Added => {}
        Merge::Replaced(old) => query.notes.push(format!(
            "{} bound {} replaced by {}",
            attr,
            old.describe(upper),
            new
        )),
        Merge::Contradicted(old) => query.notes.push(format!(
            "conflicting {} bounds: dropped {}, kept {}",
            attr,
            old.describe(!upper),
            new
        )),
    }
}

/// Second pass: hints, categories, stop words and keyword terms
fn extract_terms(tokens: &[String], query: &mut StructuredQuery) {
    let mut i = 0;
    while i < tokens.len() {
        let hint = match_hint(tokens, i);
        let category = match_category(tokens, i);

        if let Some(h) = hint {
            query.hints.insert(h.tag);
        }

        if let Some(c) = category {
            match &query.category {
                None => {
                    query.category = Some(CategoryHint {
                        name: c.canonical.to_string(),
                        family: c.family.to_string(),
                    })
                }
                Some(first) if first.name != c.canonical => query.notes.push(format!(
                    "also mentioned {}, using {}",
                    c.canonical, first.name
                )),
                Some(_) => {}
            }
            for token in &tokens[i..i + c.phrase.len()] {
                push_term(query, token);
            }
            i += c.phrase.len();
            continue;
        }

        if let Some(h) = hint {
            if !h.consume {
                for token in &tokens[i..i + h.phrase.len()] {
                    push_term(query, token);
                }
            }
            i += h.phrase.len();
            continue;
        }

        if !is_stop_word(&tokens[i]) {
            push_term(query, &tokens[i]);
        }
        i += 1;
    }
}

fn push_term(query: &mut StructuredQuery, token: &str) {
    // symbols never make useful keywords
    if !token.chars().any(char::is_alphanumeric) {
        return;
    }
    if !query.terms.iter().any(|t| t == token) {
        query.terms.push(token.to_string());
    }
}

fn at_least(attr: NumericAttribute, value: f64) -> Constraint {
    Constraint::new(attr, Range::from_comparison(Comparison::AtLeast, value))
}

fn at_most(attr: NumericAttribute, value: f64) -> Constraint {
    Constraint::new(attr, Range::from_comparison(Comparison::AtMost, value))
}

/// Soft preferences a hint expands to
pub fn expand_hint(tag: HintTag) -> Vec<Preference> {
    use NumericAttribute::*;

    match tag {
        HintTag::PerformanceOriented => vec![
            Preference::text(tag, 1.0, TextAttribute::Graphics, DEDICATED_GRAPHICS),
            Preference::text(tag, 0.5, TextAttribute::Processor, HIGH_TIER_PROCESSORS),
            Preference::numeric(tag, 0.5, at_least(Memory, 16.0)),
        ],
        HintTag::Creator => vec![
            Preference::numeric(tag, 0.5, at_least(Memory, 16.0)),
            Preference::numeric(tag, 0.5, at_least(Storage, 512.0)),
            Preference::text(tag, 0.5, TextAttribute::Graphics, DEDICATED_GRAPHICS),
        ],
        HintTag::Budget => vec![Preference::numeric(tag, 1.0, at_least(Discount, 15.0))],
        HintTag::Portable => vec![
            Preference::numeric(tag, 0.5, at_most(Weight, 1.5)),
            Preference::numeric(tag, 0.5, at_most(ScreenSize, 14.0)),
        ],
        HintTag::Premium => vec![Preference::numeric(tag, 0.5, at_least(Rating, 4.5))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(q: &StructuredQuery, attr: NumericAttribute) -> (Option<f64>, Option<f64>) {
        let range = q.constraints.get(&attr).copied().unwrap_or_default();
        (range.min.map(|l| l.value), range.max.map(|l| l.value))
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(matches!(interpret(""), Err(Error::EmptyQuery)));
        assert!(matches!(interpret("   \t "), Err(Error::EmptyQuery)));
    }

    #[test]
    fn test_gaming_laptop_under_price() {
        let q = interpret("gaming laptop under 150000").unwrap();
        assert_eq!(q.terms, vec!["gaming", "laptop"]);
        assert_eq!(q.category.as_ref().unwrap().name, "gaming laptop");
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(150000.0)));
        assert!(q.has_hint(HintTag::PerformanceOriented));
        assert_eq!(q.preferences.len(), 3);
    }

    #[test]
    fn test_memory_constraint_and_noun() {
        let q = interpret("laptop with at least 32GB ram").unwrap();
        assert_eq!(q.terms, vec!["laptop"]);
        assert_eq!(bound(&q, NumericAttribute::Memory), (Some(32.0), None));
        assert!(q.constraints.get(&NumericAttribute::Price).is_none());
    }

    #[test]
    fn test_noun_before_comparator() {
        let q = interpret("ram at least 16 gb").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Memory), (Some(16.0), None));
        assert_eq!(q.terms, vec!["ram at least 16 gb"]);
    }

    #[test]
    fn test_large_data_size_is_storage() {
        let q = interpret("laptop over 1tb").unwrap();
        let range = q.constraints[&NumericAttribute::Storage];
        assert_eq!(range.min.map(|l| (l.value, l.inclusive)), Some((1000.0, false)));
    }

    #[test]
    fn test_currency_and_k_suffix() {
        let q = interpret("phone under $1,200").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(1200.0)));
        let q = interpret("laptop below 80k").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(80000.0)));
        let q = interpret("shoes under 100 dollars").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(100.0)));
    }

    #[test]
    fn test_between_range() {
        let q = interpret("laptop between 500 and 800").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (Some(500.0), Some(800.0)));

        let q = interpret("tablet between 8 and 16 gb").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Memory), (Some(8.0), Some(16.0)));
    }

    #[test]
    fn test_screen_weight_rating_discount() {
        let q = interpret("laptop under 14 inch, less than 1.5kg, above 4 stars, over 20% off")
            .unwrap();
        assert_eq!(bound(&q, NumericAttribute::ScreenSize), (None, Some(14.0)));
        assert_eq!(bound(&q, NumericAttribute::Weight), (None, Some(1.5)));
        assert_eq!(bound(&q, NumericAttribute::Rating), (Some(4.0), None));
        assert_eq!(bound(&q, NumericAttribute::Discount), (Some(20.0), None));
        assert_eq!(q.terms, vec!["laptop"]);
    }

    #[test]
    fn test_noun_after_quantity_not_reused() {
        let q = interpret("laptop with 16gb ram under 80000").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(80000.0)));
        assert!(q.constraints.get(&NumericAttribute::Memory).is_none());
        assert_eq!(q.terms, vec!["laptop", "16gb", "ram"]);

        let q = interpret("laptop 16 gb ram under 80000").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(80000.0)));
    }

    #[test]
    fn test_short_units_as_separate_tokens() {
        let q = interpret("laptop under 14 in").unwrap();
        assert_eq!(bound(&q, NumericAttribute::ScreenSize), (None, Some(14.0)));
        assert!(q.constraints.get(&NumericAttribute::Price).is_none());

        let q = interpret("laptop under 1500 g").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Weight), (None, Some(1.5)));

        let q = interpret("between 13 in and 15 in laptop").unwrap();
        assert_eq!(bound(&q, NumericAttribute::ScreenSize), (Some(13.0), Some(15.0)));

        let q = interpret("under 500 in red").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(500.0)));
    }

    #[test]
    fn test_contradictory_bounds_keep_later() {
        let q = interpret("laptop over 1000 under 800").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Price), (None, Some(800.0)));
        assert_eq!(
            q.notes,
            vec!["conflicting price bounds: dropped > 1000, kept ≤ 800"]
        );
    }

    #[test]
    fn test_guarded_comparators_need_evidence() {
        let q = interpret("nike air max 270").unwrap();
        assert!(q.constraints.is_empty());
        assert_eq!(q.terms, vec!["nike", "air", "max", "270"]);

        let q = interpret("laptop max 1.5kg").unwrap();
        assert_eq!(bound(&q, NumericAttribute::Weight), (None, Some(1.5)));
    }

    #[test]
    fn test_unparsed_phrases_stay_terms() {
        let q = interpret("16gb laptop").unwrap();
        assert!(q.constraints.is_empty());
        assert_eq!(q.terms, vec!["16gb", "laptop"]);

        let q = interpret("under armour shoes").unwrap();
        assert!(q.constraints.is_empty());
        assert_eq!(q.terms, vec!["under", "armour", "shoes"]);
    }

    #[test]
    fn test_budget_hint_consumed() {
        let q = interpret("budget ultrabook").unwrap();
        assert_eq!(q.terms, vec!["ultrabook"]);
        assert!(q.has_hint(HintTag::Budget));
        assert_eq!(q.category.as_ref().unwrap().family, "laptop");
        assert_eq!(q.preferences.len(), 1);
        assert_eq!(q.preferences[0].weight, 1.0);
    }

    #[test]
    fn test_stop_words_and_dedup() {
        let q = interpret("I need a laptop for the laptop bag").unwrap();
        assert_eq!(q.terms, vec!["laptop", "bag"]);
    }

    #[test]
    fn test_all_stop_words_fall_back_to_raw() {
        let q = interpret("  Show  ME ").unwrap();
        assert_eq!(q.terms, vec!["show me"]);
    }

    #[test]
    fn test_second_category_noted() {
        let q = interpret("tablet or laptop").unwrap();
        assert_eq!(q.category.as_ref().unwrap().name, "tablet");
        assert_eq!(q.notes, vec!["also mentioned laptop, using tablet"]);
    }

    #[test]
    fn test_interpretation_is_deterministic() {
        let raw = "lightweight creator laptop under ₹1,50,000 with 16gb ram";
        assert_eq!(interpret(raw).unwrap(), interpret(raw).unwrap());
    }
}
