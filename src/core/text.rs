//! Text normalization and similarity helpers shared by the matcher.

use std::collections::{BTreeSet, HashSet};

/// Words that carry no identifying weight in an episode title.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "at", "for", "with", "by", "from",
    "is", "it", "its", "as", "be", "but", "up", "out", "into", "vs",
];

/// Case-fold and strip punctuation.
///
/// Apostrophes disappear (`Pup's` becomes `pups`), `&` reads as `and`,
/// every other non-alphanumeric character separates words.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' | '\u{2018}' | '\u{2019}' | '`' | '\u{00B4}' => {}
            '&' => out.push_str(" and "),
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words of an already normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Tokens that are neither stopwords nor bare numbers.
pub fn content_tokens(normalized: &str) -> Vec<&str> {
    tokens(normalized)
        .into_iter()
        .filter(|t| !is_stopword(t) && !t.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Content tokens long enough to identify a title on their own.
pub fn nouns(normalized: &str) -> HashSet<&str> {
    content_tokens(normalized)
        .into_iter()
        .filter(|t| t.chars().count() > 3)
        .collect()
}

fn sorted_unique(normalized: &str) -> String {
    let set: BTreeSet<&str> = tokens(normalized).into_iter().collect();
    set.into_iter().collect::<Vec<_>>().join(" ")
}

/// Similarity of two normalized strings in `0.0..=1.0`.
///
/// Best of the plain edit ratio and the edit ratio over sorted unique
/// tokens, so word order does not matter but extra words still cost.
pub fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let plain = strsim::normalized_levenshtein(a, b);
    let sorted = strsim::normalized_levenshtein(&sorted_unique(a), &sorted_unique(b));
    plain.max(sorted) as f32
}

/// Whether `needle` occurs in `haystack` on word boundaries.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let padded_hay = format!(" {} ", haystack);
    let padded_needle = format!(" {} ", needle);
    padded_hay.contains(&padded_needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Danger-Thon!"), "danger thon");
        assert_eq!(normalize("  Pup's   Big_Day "), "pups big day");
        assert_eq!(normalize("Rock & Roll"), "rock and roll");
        assert_eq!(normalize("Pups\u{2019} Party: Part 2"), "pups party part 2");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_content_tokens() {
        assert_eq!(
            content_tokens("pups and the kitty tastrophe"),
            vec!["pups", "kitty", "tastrophe"]
        );
        assert_eq!(content_tokens("the 2 of us"), vec!["us"]);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("danger thon", "danger thon"), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        assert!(similarity("pups save a train", "pups save the train") > 0.8);
        assert!(similarity("save a train pups", "pups save a train") > 0.99);
    }

    #[test]
    fn test_similarity_does_not_saturate_on_containment() {
        let stem = normalize("Pups And The Kitty Tastrophe Pups Save A Train");
        assert!(similarity(&stem, "pups and the kitty tastrophe") < 0.75);
        assert!(similarity(&stem, "pups save a train") < 0.75);
    }

    #[test]
    fn test_contains_words() {
        assert!(contains_words("pups save a train", "save a"));
        assert!(!contains_words("pups save a train", "ave a"));
        assert!(!contains_words("pups", ""));
    }
}
