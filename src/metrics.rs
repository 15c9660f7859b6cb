//! Aggregate views over a post collection: date filtering, totals, daily
//! series per metric, sentiment distribution and the top-viewed table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use crate::record::Post;
use crate::sentiment::{SentimentCategory, categorize};

/// Numeric per-post metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Replies,
    Reposts,
    Likes,
    Views,
    Followers,
    /// (likes + reposts + replies) per view, in percent.
    EngagementRate,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Replies,
        Metric::Reposts,
        Metric::Likes,
        Metric::Views,
        Metric::Followers,
        Metric::EngagementRate,
    ];

    /// Typed accessor for this metric.
    pub fn accessor(self) -> fn(&Post) -> f64 {
        match self {
            Metric::Replies => |p: &Post| p.replies as f64,
            Metric::Reposts => |p: &Post| p.reposts as f64,
            Metric::Likes => |p: &Post| p.likes as f64,
            Metric::Views => |p: &Post| p.views as f64,
            Metric::Followers => |p: &Post| p.followers as f64,
            Metric::EngagementRate => engagement_rate,
        }
    }

    pub fn value(self, post: &Post) -> f64 {
        (self.accessor())(post)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Replies => "replies",
            Metric::Reposts => "reposts",
            Metric::Likes => "likes",
            Metric::Views => "views",
            Metric::Followers => "followers",
            Metric::EngagementRate => "engagement_rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interactions per view in percent. Zero views count as one view.
pub fn engagement_rate(post: &Post) -> f64 {
    let interactions = post.likes as f64 + post.reposts as f64 + post.replies as f64;
    interactions * 100.0 / post.views.max(1) as f64
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Smallest range covering every post, `None` for an empty collection.
    pub fn spanning<'a, I>(posts: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut dates = posts.into_iter().map(|p| p.date.date());
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Posts whose calendar date lies in `range`. The source is not modified.
pub fn filter_by_date(posts: &[Post], range: DateRange) -> Vec<&Post> {
    posts
        .iter()
        .filter(|p| range.contains(p.date.date()))
        .collect()
}

/// Headline numbers for a (possibly filtered) collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_posts: usize,
    pub total_views: u64,
    pub total_reposts: u64,
    pub total_followers: u64,
    /// Arithmetic mean of the scored posts' sentiment. `NaN` when there is
    /// nothing to average; callers must check before displaying.
    pub mean_sentiment: f64,
}

impl Summary {
    pub fn compute<'a, I>(posts: I) -> Self
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut summary = Summary {
            total_posts: 0,
            total_views: 0,
            total_reposts: 0,
            total_followers: 0,
            mean_sentiment: f64::NAN,
        };
        let mut sentiment_sum = 0.0;
        let mut scored = 0usize;
        for post in posts {
            summary.total_posts += 1;
            summary.total_views = summary.total_views.saturating_add(post.views);
            summary.total_reposts = summary.total_reposts.saturating_add(post.reposts);
            summary.total_followers = summary.total_followers.saturating_add(post.followers);
            if let Some(score) = post.sentiment_score() {
                sentiment_sum += score;
                scored += 1;
            }
        }
        if scored > 0 {
            summary.mean_sentiment = sentiment_sum / scored as f64;
        }
        summary
    }

    /// Category of the mean sentiment, `None` when the mean is undefined.
    pub fn overall_category(&self) -> Option<SentimentCategory> {
        (!self.mean_sentiment.is_nan()).then(|| categorize(self.mean_sentiment))
    }
}

/// Sum of `metric` per calendar day, ordered by date.
pub fn daily_series<'a, I>(posts: I, metric: Metric) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a Post>,
{
    let value = metric.accessor();
    let mut series = BTreeMap::new();
    for post in posts {
        *series.entry(post.date.date()).or_insert(0.0) += value(post);
    }
    series
}

/// Number of posts per sentiment category. Unscored posts are not counted;
/// categories without posts are absent.
pub fn sentiment_distribution<'a, I>(posts: I) -> BTreeMap<SentimentCategory, usize>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut counts = BTreeMap::new();
    for category in posts.into_iter().filter_map(Post::sentiment_category) {
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

/// The `k` most viewed posts, views descending; equal views keep input order.
pub fn top_viewed<'a, I>(posts: I, k: usize) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    sorted.sort_by(|a, b| b.views.cmp(&a.views));
    sorted.truncate(k);
    sorted
}

/// First `max_chars` characters of `content`, with `...` appended when cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
