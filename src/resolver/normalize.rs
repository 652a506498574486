//! Cache-key normalization for free-text exercise names

/// Canonical comparison key: lower-cased, apostrophes dropped, other
/// punctuation turned into spaces, whitespace collapsed and trimmed.
pub fn normalize(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len());
    // classify after lowercasing: some lowercase forms expand to several chars
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch == '\'' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_alphanumeric() {
            spaced.push(ch);
        } else {
            spaced.push(' ');
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-separated words of the normalized form
pub fn tokens(raw: &str) -> Vec<String> {
    normalize(raw).split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect()
}

/// `word` is `stem` with a plural suffix ("rows", "lunges")
pub fn is_plural_of(word: &str, stem: &str) -> bool {
    word.strip_suffix('s') == Some(stem) || word.strip_suffix("es") == Some(stem)
}

/// Same word, allowing a plural on either side
pub fn same_word(a: &str, b: &str) -> bool {
    a == b || is_plural_of(a, b) || is_plural_of(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_share_a_key() {
        assert_eq!(normalize("EZ-Bar Curl"), "ez bar curl");
        assert_eq!(normalize("ez bar curl"), "ez bar curl");
        assert_eq!(normalize("  Ez-Bar   Curl "), "ez bar curl");
    }

    #[test]
    fn test_punctuation_and_parentheses() {
        assert_eq!(normalize("Lat Pulldown (Medium Grip)"), "lat pulldown medium grip");
        assert_eq!(normalize("Farmer's Walk"), "farmers walk");
        assert_eq!(normalize("Push-Up, Wide!"), "push up wide");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "  T-Bar Row ",
            "Chest-Supported T-Bar Row",
            "Farmer’s Carry",
            "",
            "(( ))",
            "İnverted Row",
            "ΣQUAT Ǆ",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" -- "), "");
        assert!(tokens("---").is_empty());
    }

    #[test]
    fn test_expanding_lowercase_is_stable() {
        let once = normalize("İnverted Row");
        assert_eq!(once, normalize(&once));
        assert_eq!(once, normalize(&once.to_uppercase()));
    }

    #[test]
    fn test_same_word() {
        assert!(same_word("rows", "row"));
        assert!(same_word("lunge", "lunges"));
        assert!(same_word("press", "presses"));
        assert!(!same_word("t", "row"));
    }

    #[test]
    fn test_tokens() {
        assert_eq!(tokens("Single-Arm Cable Row"), vec!["single", "arm", "cable", "row"]);
    }
}
