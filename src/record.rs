//! Record normalization: CSV rows to typed [`Post`]s.
//!
//! Dates are strict (one bad date aborts the load), everything else is
//! lenient: counters default to `0`, a missing location becomes
//! [`UNKNOWN_LOCATION`], missing content becomes the empty string. No row is
//! ever dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::sentiment::{Sentiment, SentimentCategory};

/// Sentinel used for posts without a location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One normalized row of the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub date: NaiveDateTime,
    pub content: String,
    pub user_name: Option<String>,
    pub location: String,
    pub replies: u64,
    pub reposts: u64,
    pub likes: u64,
    pub views: u64,
    pub followers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<Sentiment>,
}

impl Post {
    /// A post with zeroed counters and an unknown location.
    pub fn new(date: NaiveDateTime, content: impl Into<String>) -> Self {
        Self {
            date,
            content: content.into(),
            user_name: None,
            location: UNKNOWN_LOCATION.to_string(),
            replies: 0,
            reposts: 0,
            likes: 0,
            views: 0,
            followers: 0,
            source: None,
            tags: None,
            sentiment: None,
        }
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn sentiment_score(&self) -> Option<f64> {
        self.sentiment.map(|s| s.score)
    }

    pub fn sentiment_category(&self) -> Option<SentimentCategory> {
        self.sentiment.map(|s| s.category)
    }

    /// Attach the derived sentiment. Write-once: returns `false` and leaves
    /// the post untouched if a sentiment was already assigned.
    pub fn assign_sentiment(&mut self, sentiment: Sentiment) -> bool {
        if self.sentiment.is_some() {
            return false;
        }
        self.sentiment = Some(sentiment);
        true
    }
}

const REQUIRED_COLUMNS: [&str; 9] = [
    "date",
    "content",
    "user name",
    "location",
    "replies",
    "reposts",
    "likes",
    "views",
    "followers",
];

/// Header positions resolved once per load.
struct Columns {
    date: usize,
    content: usize,
    user_name: usize,
    location: usize,
    replies: usize,
    reposts: usize,
    likes: usize,
    views: usize,
    followers: usize,
    source: Option<usize>,
    tags: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| find(name).ok_or_else(|| AnalyticsError::MissingColumn(name.into()));

        // Report the first missing column in declaration order.
        for name in REQUIRED_COLUMNS {
            require(name)?;
        }
        Ok(Self {
            date: require("date")?,
            content: require("content")?,
            user_name: require("user name")?,
            location: require("location")?,
            replies: require("replies")?,
            reposts: require("reposts")?,
            likes: require("likes")?,
            views: require("views")?,
            followers: require("followers")?,
            source: find("source"),
            tags: find("tags"),
        })
    }
}

/// Load and normalize a CSV export from disk.
pub fn load_posts<P: AsRef<Path>>(path: P) -> Result<Vec<Post>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalyticsError::io(path, e))?;
    let posts = load_posts_from_reader(file)?;
    info!("Loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

/// Load and normalize CSV data from any reader. The first row is the header.
pub fn load_posts_from_reader<R: Read>(reader: R) -> Result<Vec<Post>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut posts = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        posts.push(normalize_row(&record?, &columns, i + 1)?);
    }
    Ok(posts)
}

fn normalize_row(record: &StringRecord, cols: &Columns, row: usize) -> Result<Post> {
    let raw_date = record.get(cols.date).unwrap_or("");
    let date = parse_date(raw_date).ok_or_else(|| AnalyticsError::InvalidDate {
        row,
        value: raw_date.to_string(),
    })?;

    let count = |idx: usize, name: &str| {
        let raw = record.get(idx).unwrap_or("");
        match parse_count(raw) {
            Some(n) => n,
            None => {
                if !raw.trim().is_empty() {
                    debug!("Row {row}: {name} value {raw:?} not numeric, using 0");
                }
                0
            }
        }
    };

    Ok(Post {
        date,
        content: record.get(cols.content).unwrap_or("").to_string(),
        user_name: text_cell(record, Some(cols.user_name)),
        location: text_cell(record, Some(cols.location))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        replies: count(cols.replies, "replies"),
        reposts: count(cols.reposts, "reposts"),
        likes: count(cols.likes, "likes"),
        views: count(cols.views, "views"),
        followers: count(cols.followers, "followers"),
        source: text_cell(record, cols.source),
        tags: text_cell(record, cols.tags),
        sentiment: None,
    })
}

fn text_cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Normalize a raw counter cell. Thousands separators are stripped; empty,
/// unparsable, negative or non-finite values become `0`; fractions are
/// rounded to the nearest integer.
///
/// # Example
/// ```
/// use social_pulse::normalize_count;
/// assert_eq!(normalize_count("1,234"), 1234);
/// assert_eq!(normalize_count("1234"), 1234);
/// assert_eq!(normalize_count(""), 0);
/// assert_eq!(normalize_count("n/a"), 0);
/// ```
pub fn normalize_count(raw: &str) -> u64 {
    parse_count(raw).unwrap_or(0)
}

fn parse_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v.round() as u64),
        Ok(v) if v.is_finite() => Some(0),
        _ => None,
    }
}

const OFFSET_FORMATS: [&str; 3] = [
    "%a %b %d %H:%M:%S %z %Y",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse a date cell. Offsets are converted to UTC and a trailing ` UTC` or
/// ` GMT` zone name is accepted; date-only values map to midnight. Returns `None` if no known layout matches.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    if let Some(rest) = s.strip_suffix(" UTC").or_else(|| s.strip_suffix(" GMT")) {
        return parse_date(rest);
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "date,content,user name,location,replies,reposts,likes,views,followers\n";

    fn load(body: &str) -> Result<Vec<Post>> {
        load_posts_from_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn counts_strip_grouping_and_default_to_zero() {
        let posts = load("2024-09-13,hello,anna,Paris,1,2,,\"1,500\",\"2,000\"\n").unwrap();
        let p = &posts[0];
        assert_eq!(p.views, 1500);
        assert_eq!(p.likes, 0);
        assert_eq!(p.followers, 2000);
        assert_eq!(p.replies, 1);
        assert_eq!(p.reposts, 2);
    }

    #[test]
    fn normalize_count_is_idempotent() {
        for raw in ["1,234", "0", "", "abc", "-5", "3.6", "12,345,678", "NaN", "inf"] {
            let once = normalize_count(raw);
            assert_eq!(normalize_count(&once.to_string()), once, "raw {raw:?}");
        }
        assert_eq!(normalize_count("1,234"), normalize_count("1234"));
        assert_eq!(normalize_count("-5"), 0);
        assert_eq!(normalize_count("3.6"), 4);
        assert_eq!(normalize_count(" 42 "), 42);
    }

    #[test]
    fn missing_location_and_content_default() {
        let posts = load("2024-09-13,,,,0,0,0,0,0\n").unwrap();
        assert_eq!(posts[0].location, UNKNOWN_LOCATION);
        assert_eq!(posts[0].content, "");
        assert_eq!(posts[0].user_name, None);
    }

    #[test]
    fn short_rows_are_kept_with_defaults() {
        let posts = load("2024-09-13,just text\n").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].views, 0);
        assert_eq!(posts[0].location, UNKNOWN_LOCATION);
    }

    #[test]
    fn bad_date_aborts_load() {
        let err = load("2024-09-13,ok,a,b,0,0,0,0,0\nyesterday,bad,a,b,0,0,0,0,0\n").unwrap_err();
        match err {
            AnalyticsError::InvalidDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = load_posts_from_reader("date,content\n2024-01-01,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn(ref c) if c == "user name"));
    }

    #[test]
    fn headers_match_case_insensitively_and_optional_columns_load() {
        let csv = "Date, Content ,User Name,Location,Replies,Reposts,Likes,Views,Followers,Source,Tags\n\
                   2024-09-13 08:30:00,hi,bob,Berlin,0,0,0,0,0,X,#a\n";
        let posts = load_posts_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(posts[0].source.as_deref(), Some("X"));
        assert_eq!(posts[0].tags.as_deref(), Some("#a"));
        assert_eq!(posts[0].user_name.as_deref(), Some("bob"));
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 9, 13)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        for raw in [
            "2024-09-13 10:15:00",
            "2024-09-13T10:15:00",
            "2024-09-13T10:15:00Z",
            "2024-09-13T12:15:00+02:00",
            "2024-09-13 10:15",
            "09/13/2024 10:15",
            "Fri Sep 13 10:15:00 +0000 2024",
            "2024-09-13 10:15:00.000",
            "2024-09-13 10:15:00 UTC",
            "2024-09-13T10:15:00 GMT",
            "Fri, 13 Sep 2024 10:15:00 GMT",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "layout {raw:?}");
        }
        assert_eq!(
            parse_date("2024-09-13"),
            NaiveDate::from_ymd_opt(2024, 9, 13).map(|d| d.and_time(NaiveTime::MIN))
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("13th of September"), None);
    }

    #[test]
    fn sentiment_is_write_once() {
        let mut p = Post::new(parse_date("2024-01-01").unwrap(), "x");
        assert!(p.assign_sentiment(Sentiment::from_score(0.5)));
        assert!(!p.assign_sentiment(Sentiment::from_score(-0.5)));
        assert_eq!(p.sentiment_score(), Some(0.5));
        assert_eq!(p.sentiment_category(), Some(SentimentCategory::Positive));
    }
}
