//! Rule tables for query interpretation
//!
//! Each table is plain data: adding a comparison phrase, an attribute noun,
//! a category or a qualitative hint is a one-line change here and needs no
//! new parsing code.

use shopmatch_core::{Comparison, NumericAttribute};

use crate::query::HintTag;
use crate::tokenizer::singular;

/// What a comparison phrase does to the quantity that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Bound(Comparison),
    /// `between X and Y`
    Between,
}

/// A comparison phrase such as `at least` or `under`
#[derive(Debug, Clone, Copy)]
pub struct ComparisonRule {
    pub phrase: &'static [&'static str],
    pub kind: RuleKind,
    /// Only fire when the quantity carries a unit, currency or attribute
    /// noun. Keeps product names like "Air Max 270" out of the grammar.
    pub needs_evidence: bool,
}

const fn bound(phrase: &'static [&'static str], cmp: Comparison) -> ComparisonRule {
    ComparisonRule {
        phrase,
        kind: RuleKind::Bound(cmp),
        needs_evidence: false,
    }
}

const fn guarded(phrase: &'static [&'static str], cmp: Comparison) -> ComparisonRule {
    ComparisonRule {
        phrase,
        kind: RuleKind::Bound(cmp),
        needs_evidence: true,
    }
}

pub const COMPARISON_RULES: &[ComparisonRule] = &[
    bound(&["no", "more", "than"], Comparison::AtMost),
    bound(&["no", "less", "than"], Comparison::AtLeast),
    bound(&["less", "than"], Comparison::LessThan),
    bound(&["cheaper", "than"], Comparison::LessThan),
    bound(&["fewer", "than"], Comparison::LessThan),
    bound(&["lighter", "than"], Comparison::LessThan),
    bound(&["more", "than"], Comparison::GreaterThan),
    bound(&["greater", "than"], Comparison::GreaterThan),
    bound(&["bigger", "than"], Comparison::GreaterThan),
    bound(&["larger", "than"], Comparison::GreaterThan),
    bound(&["at", "most"], Comparison::AtMost),
    bound(&["up", "to"], Comparison::AtMost),
    bound(&["upto"], Comparison::AtMost),
    bound(&["at", "least"], Comparison::AtLeast),
    bound(&["atleast"], Comparison::AtLeast),
    bound(&["starting", "at"], Comparison::AtLeast),
    bound(&["under"], Comparison::AtMost),
    bound(&["below"], Comparison::AtMost),
    bound(&["within"], Comparison::AtMost),
    bound(&["over"], Comparison::GreaterThan),
    bound(&["above"], Comparison::GreaterThan),
    guarded(&["max"], Comparison::AtMost),
    guarded(&["maximum"], Comparison::AtMost),
    guarded(&["min"], Comparison::AtLeast),
    guarded(&["minimum"], Comparison::AtLeast),
    ComparisonRule {
        phrase: &["between"],
        kind: RuleKind::Between,
        needs_evidence: false,
    },
];

/// Words joining the two quantities of a `between` phrase
pub const RANGE_JOINERS: &[&str] = &["and", "to"];

/// Currency markers accepted before or after a number
pub const CURRENCY_MARKERS: &[&str] = &[
    "$", "₹", "rs", "inr", "usd", "dollar", "dollars", "rupee", "rupees", "bucks",
];

/// Words that mark a number as a star rating
pub const RATING_MARKERS: &[&str] = &["star", "stars"];

/// Attribute nouns that name what a bound applies to
pub const ATTRIBUTE_NOUNS: &[(&[&str], NumericAttribute)] = &[
    (&["screen", "size"], NumericAttribute::ScreenSize),
    (&["display", "size"], NumericAttribute::ScreenSize),
    (&["ram"], NumericAttribute::Memory),
    (&["memory"], NumericAttribute::Memory),
    (&["storage"], NumericAttribute::Storage),
    (&["ssd"], NumericAttribute::Storage),
    (&["hdd"], NumericAttribute::Storage),
    (&["disk"], NumericAttribute::Storage),
    (&["screen"], NumericAttribute::ScreenSize),
    (&["display"], NumericAttribute::ScreenSize),
    (&["weight"], NumericAttribute::Weight),
    (&["rating"], NumericAttribute::Rating),
    (&["reviews"], NumericAttribute::Reviews),
    (&["review"], NumericAttribute::Reviews),
    (&["discount"], NumericAttribute::Discount),
    (&["off"], NumericAttribute::Discount),
    (&["price"], NumericAttribute::Price),
    (&["cost"], NumericAttribute::Price),
];

/// Data sizes up to this many GB without a noun are read as memory
pub const MEMORY_GUESS_MAX_GB: f64 = 64.0;

/// A category phrase and where it sits in the taxonomy
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Singular forms
    pub phrase: &'static [&'static str],
    pub canonical: &'static str,
    pub family: &'static str,
}

const fn category(
    phrase: &'static [&'static str],
    canonical: &'static str,
    family: &'static str,
) -> CategoryRule {
    CategoryRule {
        phrase,
        canonical,
        family,
    }
}

pub const CATEGORY_RULES: &[CategoryRule] = &[
    category(&["gaming", "laptop"], "gaming laptop", "laptop"),
    category(&["gaming", "notebook"], "gaming laptop", "laptop"),
    category(&["running", "shoe"], "running shoes", "shoes"),
    category(&["ultrabook"], "ultrabook", "laptop"),
    category(&["2-in-1"], "2-in-1", "laptop"),
    category(&["convertible"], "2-in-1", "laptop"),
    category(&["laptop"], "laptop", "laptop"),
    category(&["notebook"], "laptop", "laptop"),
    category(&["desktop"], "desktop", "desktop"),
    category(&["monitor"], "monitor", "monitor"),
    category(&["tablet"], "tablet", "tablet"),
    category(&["ipad"], "tablet", "tablet"),
    category(&["smartphone"], "phone", "phone"),
    category(&["phone"], "phone", "phone"),
    category(&["mobile"], "phone", "phone"),
    category(&["headphone"], "headphones", "audio"),
    category(&["earbud"], "headphones", "audio"),
    category(&["earphone"], "headphones", "audio"),
    category(&["headset"], "headphones", "audio"),
    category(&["shoe"], "shoes", "shoes"),
    category(&["sneaker"], "shoes", "shoes"),
    category(&["trainer"], "shoes", "shoes"),
    category(&["smartwatch"], "watch", "watch"),
    category(&["watch"], "watch", "watch"),
];

/// A qualitative hint word and the tag it raises
#[derive(Debug, Clone, Copy)]
pub struct HintRule {
    pub phrase: &'static [&'static str],
    pub tag: HintTag,
    /// Drop the words from the keyword terms; they describe intent, not
    /// product text
    pub consume: bool,
}

const fn hint(phrase: &'static [&'static str], tag: HintTag, consume: bool) -> HintRule {
    HintRule {
        phrase,
        tag,
        consume,
    }
}

pub const HINT_RULES: &[HintRule] = &[
    hint(&["gaming"], HintTag::PerformanceOriented, false),
    hint(&["gamer"], HintTag::PerformanceOriented, true),
    hint(&["gamers"], HintTag::PerformanceOriented, true),
    hint(&["video", "editing"], HintTag::Creator, true),
    hint(&["content", "creation"], HintTag::Creator, true),
    hint(&["editing"], HintTag::Creator, true),
    hint(&["creator"], HintTag::Creator, true),
    hint(&["rendering"], HintTag::Creator, true),
    hint(&["budget"], HintTag::Budget, true),
    hint(&["cheap"], HintTag::Budget, true),
    hint(&["cheapest"], HintTag::Budget, true),
    hint(&["affordable"], HintTag::Budget, true),
    hint(&["inexpensive"], HintTag::Budget, true),
    hint(&["value"], HintTag::Budget, true),
    hint(&["low-cost"], HintTag::Budget, true),
    hint(&["lightweight"], HintTag::Portable, true),
    hint(&["light"], HintTag::Portable, true),
    hint(&["portable"], HintTag::Portable, true),
    hint(&["thin"], HintTag::Portable, true),
    hint(&["slim"], HintTag::Portable, true),
    hint(&["travel"], HintTag::Portable, true),
    hint(&["premium"], HintTag::Premium, true),
    hint(&["flagship"], HintTag::Premium, true),
    hint(&["high-end"], HintTag::Premium, true),
    hint(&["luxury"], HintTag::Premium, true),
];

/// Graphics strings that indicate a dedicated GPU
pub const DEDICATED_GRAPHICS: &[&str] = &["rtx", "gtx", "geforce", "radeon rx", "arc a"];

/// Processor strings of the upper performance tiers
pub const HIGH_TIER_PROCESSORS: &[&str] = &[
    "i7", "i9", "ryzen 7", "ryzen 9", "ultra 7", "ultra 9", "m3 pro", "m3 max", "m4 pro",
    "m4 max",
];

pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "for", "with", "and", "or", "of", "in", "to", "me", "my", "i", "im",
    "need", "want", "looking", "find", "show", "some", "that", "is", "on", "please",
    "something", "any", "get", "buy", "which", "has", "have", "having", "can", "should",
    "from", "by", "it", "its", "this", "like", "would", "be", "are", "but", "very", "really",
    "just", "good", "best", "new",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Match `phrase` against `tokens` starting at `at`, comparing singular
/// forms so that plurals hit the same rule.
pub fn phrase_matches(tokens: &[String], at: usize, phrase: &[&str]) -> bool {
    if at + phrase.len() > tokens.len() {
        return false;
    }
    phrase
        .iter()
        .zip(&tokens[at..])
        .all(|(p, t)| *p == t.as_str() || *p == singular(t))
}

/// Longest comparison rule starting at `at`
pub fn match_comparison(tokens: &[String], at: usize) -> Option<&'static ComparisonRule> {
    COMPARISON_RULES
        .iter()
        .filter(|r| {
            r.phrase.len() + at <= tokens.len()
                && r.phrase.iter().zip(&tokens[at..]).all(|(p, t)| *p == t.as_str())
        })
        .max_by_key(|r| r.phrase.len())
}

/// Longest attribute noun starting at `at`, with its length in tokens
pub fn match_attribute_noun(tokens: &[String], at: usize) -> Option<(NumericAttribute, usize)> {
    ATTRIBUTE_NOUNS
        .iter()
        .filter(|(phrase, _)| phrase.len() + at <= tokens.len())
        .filter(|(phrase, _)| phrase.iter().zip(&tokens[at..]).all(|(p, t)| *p == t.as_str()))
        .max_by_key(|(phrase, _)| phrase.len())
        .map(|(phrase, attr)| (*attr, phrase.len()))
}

/// Longest category phrase starting at `at`
pub fn match_category(tokens: &[String], at: usize) -> Option<&'static CategoryRule> {
    CATEGORY_RULES
        .iter()
        .filter(|r| phrase_matches(tokens, at, r.phrase))
        .max_by_key(|r| r.phrase.len())
}

/// Longest hint phrase starting at `at`
pub fn match_hint(tokens: &[String], at: usize) -> Option<&'static HintRule> {
    HINT_RULES
        .iter()
        .filter(|r| phrase_matches(tokens, at, r.phrase))
        .max_by_key(|r| r.phrase.len())
}

/// Classify free category text (a product's category) against the
/// category table. The longest phrase found anywhere wins, the earliest
/// among equals (`2-in-1 Laptop` is a 2-in-1).
pub fn classify_category(text: &str) -> Option<&'static CategoryRule> {
    let tokens = crate::tokenizer::tokenize(text);
    // max_by_key keeps the last maximum, so scan from the end
    (0..tokens.len())
        .rev()
        .filter_map(|i| match_category(&tokens, i))
        .max_by_key(|r| r.phrase.len())
}
