//! Query tokenization
//!
//! Produces lowercase tokens in input order. Currency symbols, `%` and the
//! inch mark become tokens of their own so that the constraint rules can
//! see them; glued quantities such as `32gb` stay whole and are split later
//! by the interpreter.

const SYMBOL_TOKENS: [char; 4] = ['$', '₹', '%', '"'];

/// Tokenize free text for interpretation
pub fn tokenize(text: &str) -> Vec<String> {
    let text = strip_digit_separators(&text.to_lowercase());
    let chars: Vec<char> = text.chars().collect();

    let mut tokens = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        if c.is_alphanumeric() {
            current.push(c);
        } else if c == '.' && prev.is_some_and(|p| p.is_ascii_digit()) && next.is_some_and(|n| n.is_ascii_digit()) {
            current.push(c);
        } else if c == '-' && !current.is_empty() && next.is_some_and(|n| n.is_alphanumeric()) {
            current.push(c);
        } else if c == '\'' && prev.is_some_and(|p| p.is_ascii_digit()) {
            // 13.3'' is an inch mark
            flush(&mut current, &mut tokens);
            tokens.push("\"".to_string());
            while chars.get(i + 1) == Some(&'\'') {
                i += 1;
            }
        } else if SYMBOL_TOKENS.contains(&c) {
            flush(&mut current, &mut tokens);
            tokens.push(c.to_string());
        } else {
            flush(&mut current, &mut tokens);
        }
        i += 1;
    }
    flush(&mut current, &mut tokens);

    tokens
}

/// Remove thousands separators: `150,000` and `1,50,000` become plain digits
fn strip_digit_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            !(**c == ','
                && *i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Crude English singular form used for lookups (`laptops` -> `laptop`)
pub fn singular(word: &str) -> &str {
    if word.len() <= 3 || !word.ends_with('s') || word.ends_with("ss") {
        return word;
    }
    for suffix in ["ches", "shes", "xes"] {
        if word.ends_with(suffix) {
            return &word[..word.len() - 2];
        }
    }
    &word[..word.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        assert_eq!(
            tokenize("Gaming Laptop, under 150000!"),
            vec!["gaming", "laptop", "under", "150000"]
        );
    }

    #[test]
    fn test_currency_and_separators() {
        assert_eq!(tokenize("under $1,200"), vec!["under", "$", "1200"]);
        assert_eq!(tokenize("below ₹1,50,000"), vec!["below", "₹", "150000"]);
    }

    #[test]
    fn test_glued_quantities_stay_whole() {
        assert_eq!(
            tokenize("at least 32GB RAM"),
            vec!["at", "least", "32gb", "ram"]
        );
        assert_eq!(tokenize("1.5kg."), vec!["1.5kg"]);
    }

    #[test]
    fn test_inch_marks_and_percent() {
        assert_eq!(tokenize("under 14\" screen"), vec!["under", "14", "\"", "screen"]);
        assert_eq!(tokenize("13.3'' display"), vec!["13.3", "\"", "display"]);
        assert_eq!(tokenize("over 20% off"), vec!["over", "20", "%", "off"]);
    }

    #[test]
    fn test_hyphenated_words() {
        assert_eq!(tokenize("high-end 2-in-1"), vec!["high-end", "2-in-1"]);
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("laptops"), "laptop");
        assert_eq!(singular("shoes"), "shoe");
        assert_eq!(singular("watches"), "watch");
        assert_eq!(singular("glass"), "glass");
        assert_eq!(singular("gps"), "gps");
    }
}
