//! Terminology substitution applied before text is sent for translation.

use std::collections::BTreeMap;

/// User-configured source phrase → fixed replacement.
pub type Terminology = BTreeMap<String, String>;

/// Text after terminology substitution, with a record of what was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub text: String,
    /// `"<source> → <replacement>"` entries in the order they were applied.
    pub replacements: Vec<String>,
}

/// Replaces every configured term found in `text`.
///
/// Terms are tried longest first so a short term cannot clobber part of a
/// longer one. Matching is literal and case-sensitive, with no word-boundary
/// check: a term embedded in a longer word still matches.
pub fn preprocess(text: &str, terms: &Terminology) -> Preprocessed {
    let mut sorted: Vec<(&String, &String)> =
        terms.iter().filter(|(source, _)| !source.is_empty()).collect();
    // BTreeMap order breaks length ties deterministically.
    sorted.sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()));

    let mut processed = text.to_string();
    let mut replacements = Vec::new();

    for (source, replacement) in sorted {
        if processed.contains(source.as_str()) {
            processed = processed.replace(source.as_str(), replacement);
            replacements.push(format!("{source} → {replacement}"));
        }
    }

    Preprocessed {
        text: processed,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(pairs: &[(&str, &str)]) -> Terminology {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_single_term() {
        let result = preprocess("アバター事務所", &terms(&[("アバター", "虚拟形象")]));
        assert_eq!(result.text, "虚拟形象事務所");
        assert_eq!(result.replacements, vec!["アバター → 虚拟形象"]);
    }

    #[test]
    fn test_longer_term_applied_first() {
        let result = preprocess(
            "今日はアーバンもいる",
            &terms(&[("アバモ", "X"), ("アーバンも", "Y")]),
        );
        assert_eq!(result.text, "今日はYいる");
        assert!(!result.text.contains('X'));
        assert_eq!(result.replacements, vec!["アーバンも → Y"]);
    }

    #[test]
    fn test_longer_term_consumes_region_of_shorter() {
        let result = preprocess(
            "ホロライブプロダクション",
            &terms(&[("ホロライブ", "Hololive"), ("ホロライブプロダクション", "hololive production")]),
        );
        assert_eq!(result.text, "hololive production");
        assert_eq!(
            result.replacements,
            vec!["ホロライブプロダクション → hololive production"]
        );
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let result = preprocess("cat and cat", &terms(&[("cat", "dog")]));
        assert_eq!(result.text, "dog and dog");
        assert_eq!(result.replacements.len(), 1);
    }

    #[test]
    fn test_matches_inside_words() {
        let result = preprocess("category", &terms(&[("cat", "dog")]));
        assert_eq!(result.text, "dogegory");
    }

    #[test]
    fn test_case_sensitive() {
        let result = preprocess("Cat", &terms(&[("cat", "dog")]));
        assert_eq!(result.text, "Cat");
        assert!(result.replacements.is_empty());
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let result = preprocess("C++ (beta)", &terms(&[("C++", "CPP"), ("(beta)", "β")]));
        assert_eq!(result.text, "CPP β");
    }

    #[test]
    fn test_order_of_applied_list_follows_length() {
        let result = preprocess("ab abcd", &terms(&[("ab", "1"), ("abcd", "2")]));
        assert_eq!(result.text, "1 2");
        assert_eq!(result.replacements, vec!["abcd → 2", "ab → 1"]);
    }

    #[test]
    fn test_empty_terms_and_empty_source_ignored() {
        let result = preprocess("hello", &Terminology::new());
        assert_eq!(result.text, "hello");
        assert!(result.replacements.is_empty());

        let result = preprocess("hello", &terms(&[("", "x")]));
        assert_eq!(result.text, "hello");
        assert!(result.replacements.is_empty());
    }
}
