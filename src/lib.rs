#![forbid(unsafe_code)]
//! # social_pulse
//!
//! Analytics for tabular exports of social media posts: record normalization,
//! sentiment scoring, stopword-aware word and phrase frequencies, hashtag and
//! location counts, plus the aggregate views a dashboard or report needs.
//!
//! Every analytic is a pure function over a (possibly filtered) slice of
//! [`Post`]s; nothing is cached between calls.
//!
//! ## Example
//! ```
//! use social_pulse::{load_posts_from_reader, PhraseAnalyzer, SentimentScorer, post_hashtags};
//!
//! let csv = "date,content,user name,location,replies,reposts,likes,views,followers\n\
//!            2024-09-13,Great results! #EGFR,onc,Madrid,0,1,2,\"1,500\",10\n";
//! let mut posts = load_posts_from_reader(csv.as_bytes()).unwrap();
//! let scorer: SentimentScorer = SentimentScorer::default();
//! scorer.score_posts(&mut posts);
//!
//! assert_eq!(posts[0].views, 1500);
//! assert!(posts[0].sentiment_score().unwrap() > 0.0);
//! assert_eq!(post_hashtags(&posts)["egfr"], 1);
//! let words = PhraseAnalyzer::default().word_frequency(&posts[0].content, false);
//! assert_eq!(words[0].1, 1);
//! ```

pub mod error;
pub mod export;
pub mod frequency;
pub mod hashtags;
pub mod locations;
pub mod metrics;
pub mod phrases;
pub mod record;
pub mod report;
pub mod sentiment;
pub mod stopwords;
pub mod tokenize;

pub use error::{AnalyticsError, Result};
pub use export::{ExportFormat, csv_safe_cell, export_report};
pub use frequency::{FrequencyTable, count_items, rank_by_count, top};
pub use hashtags::{extract_hashtags, post_hashtags};
pub use locations::aggregate_locations;
pub use metrics::{
    DateRange, Metric, Summary, daily_series, engagement_rate, filter_by_date, preview,
    sentiment_distribution, top_viewed,
};
pub use phrases::{DEFAULT_RELEVANCE_TERMS, PhraseAnalyzer, ngram_counts};
pub use record::{
    Post, UNKNOWN_LOCATION, load_posts, load_posts_from_reader, normalize_count, parse_date,
};
pub use report::{AnalysisOptions, AnalysisReport, TopPost, analyze_file, analyze_posts};
pub use sentiment::{
    LexiconPolarity, Polarity, PolarityError, Sentiment, SentimentCategory, SentimentScorer,
    categorize,
};
pub use stopwords::{StopwordFilter, load_stopword_file};
pub use tokenize::tokenize;
