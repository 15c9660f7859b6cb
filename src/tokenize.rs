use std::sync::LazyLock;

use regex::Regex;

use crate::stopwords::StopwordFilter;

/// Minimum token length kept by [`tokenize`].
pub const MIN_TOKEN_LEN: usize = 3;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S*").expect("valid URL pattern"));

static NON_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("valid letter pattern"));

///Splits text into normalized word tokens.
///Lowercases, removes URLs, removes every character that is not `a-z` or whitespace
///(without inserting a break, so `covid-19` becomes `covid` and `don't` becomes `dont`),
///splits at whitespace and drops stopwords and tokens shorter than three characters.
/// # Example
/// ```
/// use social_pulse::{tokenize, StopwordFilter};
/// let tokens = tokenize("Great results! https://example.com", &StopwordFilter::new(false));
/// assert_eq!(tokens, vec!["great".to_string(), "results".to_string()]);
/// ```
pub fn tokenize(text: &str, stopwords: &StopwordFilter) -> Vec<String> {
    let lowered = text.to_lowercase();
    let without_urls = URL.replace_all(&lowered, "");
    let letters_only = NON_LETTER.replace_all(&without_urls, "");
    letters_only
        .split_whitespace()
        .filter(|w| w.len() >= MIN_TOKEN_LEN && !stopwords.is_stopword(w))
        .map(String::from)
        .collect()
}
