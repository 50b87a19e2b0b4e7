//! Small text helpers shared by the extraction strategies.

/// Title-case a phrase word by word.
///
/// Each whitespace-separated word, and each hyphen-joined part of a word,
/// gets an uppercase first character and a lowercase remainder; runs of
/// whitespace collapse to a single space. Apostrophes and digits stay inside
/// the word ("newton's law" → "Newton's Law", "supply-side" → "Supply-Side").
pub fn title_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    for word in phrase.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut at_start = true;
        for ch in word.chars() {
            if at_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_start = ch == '-';
        }
    }
    out
}

/// Count how many whitespace-separated words of `phrase` occur as substrings
/// of `haystack`.
///
/// Returns `(matched, total)`. Both inputs are expected to be lowercased
/// already. Substring containment is deliberate: "policy" is found inside
/// "policymakers".
pub fn word_coverage(phrase: &str, haystack: &str) -> (usize, usize) {
    let mut matched = 0;
    let mut total = 0;
    for word in phrase.split_whitespace() {
        total += 1;
        if haystack.contains(word) {
            matched += 1;
        }
    }
    (matched, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("monetary policy"), "Monetary Policy");
        assert_eq!(title_case("  LAW   of motion "), "Law Of Motion");
    }

    #[test]
    fn title_case_keeps_apostrophes_and_digits_inside_words() {
        assert_eq!(title_case("newton's law"), "Newton's Law");
        assert_eq!(title_case("19th century"), "19th Century");
    }

    #[test]
    fn title_case_capitalizes_after_hyphens() {
        assert_eq!(title_case("supply-side economics"), "Supply-Side Economics");
        assert_eq!(title_case("POST-WAR era"), "Post-War Era");
        assert_eq!(title_case("well--known"), "Well--Known");
    }

    #[test]
    fn title_case_empty() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("   "), "");
    }

    #[test]
    fn coverage_counts_substring_hits() {
        assert_eq!(word_coverage("monetary policy", "the policymakers met"), (1, 2));
        assert_eq!(word_coverage("indus valley", "indus valley sites"), (2, 2));
        assert_eq!(word_coverage("", "anything"), (0, 0));
    }
}
