//! Ranked word and phrase frequencies.
//!
//! Phrases are contiguous token windows ("n-grams") of the tokenized text.
//! Every window length in the requested range is counted independently, so
//! a phrase and the longer phrases containing it are separate entries.
//! Ranking uses a relevance score (longer phrases first, phrases containing a
//! relevance term boosted) while the reported values stay raw counts.

use std::collections::HashSet;

use crate::error::{AnalyticsError, Result};
use crate::frequency::{FrequencyTable, count_items, rank_by_count};
use crate::stopwords::StopwordFilter;
use crate::tokenize::tokenize;

/// Default n-gram window when the caller does not choose one.
pub const DEFAULT_MIN_N: usize = 2;
pub const DEFAULT_MAX_N: usize = 5;

/// Score bonus for phrases containing a relevance term.
pub const RELEVANCE_BONUS: usize = 3;

/// Clinical vocabulary used as relevance terms when none are configured.
pub const DEFAULT_RELEVANCE_TERMS: &[&str] = &[
    "survival",
    "progression",
    "efficacy",
    "safety",
    "trial",
    "phase",
    "treatment",
    "therapy",
    "patients",
    "cancer",
    "nsclc",
    "egfr",
    "mutation",
    "amivantamab",
    "lazertinib",
    "osimertinib",
    "mariposa",
    "clinical",
    "response",
    "chemotherapy",
    "oncology",
    "tumor",
    "approval",
];

/// Builds ranked frequency tables from free text.
#[derive(Debug, Clone)]
pub struct PhraseAnalyzer {
    relevance_terms: HashSet<String>,
    keep_common: StopwordFilter,
    drop_common: StopwordFilter,
}

impl Default for PhraseAnalyzer {
    fn default() -> Self {
        Self::with_terms(DEFAULT_RELEVANCE_TERMS)
    }
}

impl PhraseAnalyzer {
    /// Analyzer boosting phrases that contain any of `terms` (matched per
    /// token, lowercase).
    pub fn with_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            relevance_terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            keep_common: StopwordFilter::new(true),
            drop_common: StopwordFilter::new(false),
        }
    }

    /// Additional stopwords applied on top of the built-in sets.
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        self.keep_common = self.keep_common.with_extra(&words);
        self.drop_common = self.drop_common.with_extra(&words);
        self
    }

    pub fn relevance_terms(&self) -> &HashSet<String> {
        &self.relevance_terms
    }

    fn stopwords(&self, include_common: bool) -> &StopwordFilter {
        if include_common {
            &self.keep_common
        } else {
            &self.drop_common
        }
    }

    pub fn tokenize(&self, text: &str, include_common: bool) -> Vec<String> {
        tokenize(text, self.stopwords(include_common))
    }

    /// Ranking key of a space-joined phrase: `2 × words`, plus
    /// [`RELEVANCE_BONUS`] if any word is a relevance term.
    pub fn relevance_score(&self, phrase: &str) -> usize {
        let mut words = 0;
        let mut relevant = false;
        for w in phrase.split(' ') {
            words += 1;
            relevant |= self.relevance_terms.contains(w);
        }
        2 * words + if relevant { RELEVANCE_BONUS } else { 0 }
    }

    /// Count every phrase of `min_n..=max_n` tokens.
    ///
    /// With `min_n == max_n == 1` this is a plain word count ranked by count
    /// descending. Otherwise entries are ranked by relevance score descending,
    /// ties by phrase ascending; the returned numbers are occurrence counts.
    pub fn analyze(
        &self,
        text: &str,
        min_n: usize,
        max_n: usize,
        include_common: bool,
    ) -> Result<Vec<(String, usize)>> {
        if min_n == 0 || min_n > max_n {
            return Err(AnalyticsError::InvalidNgramRange {
                min: min_n,
                max: max_n,
            });
        }
        let tokens = self.tokenize(text, include_common);
        if max_n == 1 {
            return Ok(rank_by_count(count_items(&tokens)));
        }

        let counts = ngram_counts(&tokens, min_n, max_n);
        let mut ranked: Vec<(usize, String, usize)> = counts
            .into_iter()
            .map(|(phrase, count)| (self.relevance_score(&phrase), phrase, count))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(ranked
            .into_iter()
            .map(|(_, phrase, count)| (phrase, count))
            .collect())
    }

    /// Word frequencies ranked by count (`analyze` with a 1..1 window).
    pub fn word_frequency(&self, text: &str, include_common: bool) -> Vec<(String, usize)> {
        let tokens = self.tokenize(text, include_common);
        rank_by_count(count_items(&tokens))
    }
}

/// Sliding-window phrase counts over a token stream.
pub fn ngram_counts(tokens: &[String], min_n: usize, max_n: usize) -> FrequencyTable {
    let mut counts = FrequencyTable::new();
    for n in min_n.max(1)..=max_n {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}
