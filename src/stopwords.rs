//! Stopword sets.
//!
//! The base set (standard English list plus social-media noise) and the
//! optional common-terms set are built once on first use and shared
//! read-only afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{AnalyticsError, Result};

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Platform noise filtered alongside the English list.
pub const SOCIAL_NOISE: &[&str] = &["rt", "via", "amp"];

/// Domain-generic words filtered unless the caller asks to keep them.
pub const COMMON_TERMS: &[&str] = &[
    "new", "update", "updates", "breaking", "news", "today", "latest", "read", "check", "join",
    "watch", "live", "week", "day", "year",
];

/// Contractions are stored the way the tokenizer emits them (`don't` as
/// `dont`).
static BASE: LazyLock<HashSet<String>> = LazyLock::new(|| {
    ENGLISH
        .iter()
        .chain(SOCIAL_NOISE)
        .map(|w| strip_apostrophes(w))
        .collect()
});

static COMMON: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| COMMON_TERMS.iter().copied().collect());

/// Stopword membership test for the tokenizer.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    include_common: bool,
    extra: HashSet<String>,
}

impl StopwordFilter {
    /// `include_common = true` keeps the [`COMMON_TERMS`] in the token stream.
    pub fn new(include_common: bool) -> Self {
        Self {
            include_common,
            extra: HashSet::new(),
        }
    }

    /// Add caller-supplied stopwords (matched lowercase, apostrophes dropped).
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra.extend(
            words
                .into_iter()
                .map(|w| strip_apostrophes(&w.as_ref().trim().to_lowercase())),
        );
        self.extra.remove("");
        self
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        BASE.contains(word)
            || (!self.include_common && COMMON.contains(word))
            || self.extra.contains(word)
    }
}

fn strip_apostrophes(word: &str) -> String {
    word.chars().filter(|c| *c != '\'').collect()
}

/// Read a stopword file: one word per line, blank lines and `#` comments
/// ignored.
pub fn load_stopword_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}
