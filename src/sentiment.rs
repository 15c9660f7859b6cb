//! Sentiment scoring.
//!
//! A [`Polarity`] backend maps text to a signed score. [`SentimentScorer`]
//! wraps a backend and never fails: backend errors and non-finite scores are
//! logged and collapse to `0.0` (neutral). Categories are a pure function of
//! the score sign, see [`categorize`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::record::Post;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a polarity to its category: `> 0` positive, `< 0` negative, anything
/// else (zero, NaN) neutral.
///
/// # Example
/// ```
/// use social_pulse::{categorize, SentimentCategory};
/// assert_eq!(categorize(0.4), SentimentCategory::Positive);
/// assert_eq!(categorize(0.0), SentimentCategory::Neutral);
/// assert_eq!(categorize(-0.1), SentimentCategory::Negative);
/// ```
pub fn categorize(score: f64) -> SentimentCategory {
    if score > 0.0 {
        SentimentCategory::Positive
    } else if score < 0.0 {
        SentimentCategory::Negative
    } else {
        SentimentCategory::Neutral
    }
}

/// Score plus its derived category, attached to a [`Post`] once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    pub score: f64,
    pub category: SentimentCategory,
}

impl Sentiment {
    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            category: categorize(score),
        }
    }
}

/// Failure reported by a polarity backend.
#[derive(Debug, Error)]
pub enum PolarityError {
    #[error("text could not be interpreted: {0}")]
    Uninterpretable(String),

    #[error("polarity backend failed: {0}")]
    Backend(String),
}

/// A natural-language polarity function returning a score in `[-1, 1]`.
pub trait Polarity {
    fn polarity(&self, text: &str) -> Result<f64, PolarityError>;
}

/// Fail-soft scorer over a [`Polarity`] backend.
pub struct SentimentScorer<P = LexiconPolarity> {
    backend: P,
}

impl Default for SentimentScorer<LexiconPolarity> {
    fn default() -> Self {
        Self::new(LexiconPolarity)
    }
}

impl<P: Polarity> SentimentScorer<P> {
    pub fn new(backend: P) -> Self {
        Self { backend }
    }

    /// Polarity of `text`, clamped to `[-1, 1]`. Never fails: backend errors
    /// and non-finite values yield `0.0`.
    pub fn score(&self, text: &str) -> f64 {
        match self.backend.polarity(text) {
            Ok(p) if p.is_finite() => p.clamp(-1.0, 1.0),
            Ok(p) => {
                warn!("Polarity backend returned non-finite score {p}, using 0.0");
                0.0
            }
            Err(e) => {
                warn!("Sentiment scoring failed, using 0.0: {e}");
                0.0
            }
        }
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        Sentiment::from_score(self.score(text))
    }
}

impl<P: Polarity + Sync> SentimentScorer<P> {
    /// Score many texts in parallel. Output order follows input order.
    pub fn score_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<f64> {
        texts.par_iter().map(|t| self.score(t.as_ref())).collect()
    }

    /// Attach a sentiment to every post that does not have one yet.
    pub fn score_posts(&self, posts: &mut [Post]) {
        posts.par_iter_mut().for_each(|post| {
            let sentiment = self.sentiment(&post.content);
            post.assign_sentiment(sentiment);
        });
    }
}

// ---- Lexicon backend ----

/// Rule-based polarity: averages the scores of known opinion words, flipping
/// the sign (at half weight) after a negation and scaling after an intensifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconPolarity;

struct Lexicon {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
}

static LEXICON: LazyLock<Lexicon> = LazyLock::new(|| {
    let words = [
        // positive
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("fantastic", 0.4),
        ("wonderful", 1.0),
        ("best", 1.0),
        ("better", 0.5),
        ("impressive", 1.0),
        ("exciting", 0.3),
        ("excited", 0.375),
        ("happy", 0.8),
        ("love", 0.5),
        ("promising", 0.6),
        ("positive", 0.23),
        ("success", 0.3),
        ("successful", 0.75),
        ("effective", 0.6),
        ("improved", 0.5),
        ("improvement", 0.5),
        ("benefit", 0.4),
        ("breakthrough", 0.6),
        ("proud", 0.8),
        ("congratulations", 0.5),
        ("thrilled", 0.6),
        ("remarkable", 0.75),
        ("strong", 0.43),
        ("significant", 0.375),
        ("meaningful", 0.5),
        ("hope", 0.4),
        ("hopeful", 0.5),
        ("encouraging", 0.5),
        ("superior", 0.7),
        ("durable", 0.4),
        ("well", 0.3),
        ("safe", 0.5),
        ("important", 0.4),
        ("new", 0.14),
        // negative
        ("bad", -0.7),
        ("poor", -0.4),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("worse", -0.4),
        ("worst", -1.0),
        ("disappointing", -0.6),
        ("disappointed", -0.75),
        ("negative", -0.3),
        ("fail", -0.5),
        ("failed", -0.5),
        ("failure", -0.5),
        ("toxic", -0.6),
        ("toxicity", -0.5),
        ("adverse", -0.5),
        ("risk", -0.3),
        ("harmful", -0.7),
        ("dangerous", -0.6),
        ("sad", -0.5),
        ("worried", -0.4),
        ("concern", -0.3),
        ("concerning", -0.4),
        ("severe", -0.5),
        ("death", -0.6),
        ("died", -0.6),
        ("progression", -0.2),
        ("resistance", -0.3),
        ("relapse", -0.5),
        ("unfortunately", -0.5),
        ("hate", -0.8),
        ("wrong", -0.5),
        ("limited", -0.07),
        ("difficult", -0.5),
    ]
    .into_iter()
    .collect();

    let negations = [
        "not", "no", "never", "neither", "nor", "none", "nothing", "cannot", "cant", "can't",
        "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt", "wasn't",
        "wasnt", "aren't", "arent", "won't", "wont", "hardly", "barely", "without",
    ]
    .into_iter()
    .collect();

    let intensifiers = [
        ("very", 1.3),
        ("really", 1.3),
        ("extremely", 1.5),
        ("highly", 1.3),
        ("incredibly", 1.5),
        ("truly", 1.2),
        ("so", 1.2),
        ("slightly", 0.5),
        ("somewhat", 0.7),
        ("fairly", 0.8),
    ]
    .into_iter()
    .collect();

    Lexicon {
        words,
        negations,
        intensifiers,
    }
});

impl Polarity for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64, PolarityError> {
        let lexicon = &*LEXICON;
        let mut scores: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensity = 1.0;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            if lexicon.negations.contains(word.as_str()) {
                negate_next = true;
                continue;
            }
            if let Some(mult) = lexicon.intensifiers.get(word.as_str()) {
                intensity = *mult;
                continue;
            }
            if let Some(score) = lexicon.words.get(word.as_str()) {
                let mut s = *score * intensity;
                if negate_next {
                    s *= -0.5;
                }
                scores.push(s);
            }
            negate_next = false;
            intensity = 1.0;
        }

        if scores.is_empty() {
            return Ok(0.0);
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}
