//! Full analysis run over a post collection and its plain-text rendering.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::export::{Cell, ExportFormat, Table, export_report};
use crate::frequency::{rank_by_count, top};
use crate::hashtags::post_hashtags;
use crate::locations::aggregate_locations;
use crate::metrics::{
    DateRange, Metric, Summary, daily_series, filter_by_date, preview, sentiment_distribution,
    top_viewed,
};
use crate::phrases::{DEFAULT_MAX_N, DEFAULT_MIN_N, PhraseAnalyzer};
use crate::record::{Post, load_posts};
use crate::sentiment::{SentimentCategory, SentimentScorer};
use crate::stopwords::load_stopword_file;

/// Number of rows in the top-viewed table.
pub const TOP_POSTS: usize = 10;

/// Number of rows in the location table.
pub const TOP_LOCATIONS: usize = 10;

/// Characters of post content shown in the top-viewed table.
pub const PREVIEW_CHARS: usize = 200;

/// Options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Shortest phrase length, in words.
    pub min_n: usize,
    /// Longest phrase length, in words.
    pub max_n: usize,
    /// Keep domain-generic words such as "new" or "breaking".
    pub include_common: bool,
    /// Rows kept per ranked table.
    pub top_k: usize,
    /// Restrict to posts dated inside this range.
    pub date_range: Option<DateRange>,
    /// Metric used for the daily series.
    pub metric: Metric,
    /// Relevance terms for phrase ranking; `None` uses the built-in clinical list.
    pub relevance_terms: Option<Vec<String>>,
    /// Write tables in this format; `None` disables export.
    pub export_format: Option<ExportFormat>,
    /// Directory receiving exported files.
    pub out_dir: PathBuf,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_n: DEFAULT_MIN_N,
            max_n: DEFAULT_MAX_N,
            include_common: false,
            top_k: 15,
            date_range: None,
            metric: Metric::Views,
            relevance_terms: None,
            export_format: None,
            out_dir: PathBuf::from("."),
        }
    }
}

/// Row of the top-viewed table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub user_name: String,
    pub date: NaiveDate,
    pub content: String,
    pub followers: u64,
    pub views: u64,
}

impl From<&Post> for TopPost {
    fn from(post: &Post) -> Self {
        Self {
            user_name: post.user_name.clone().unwrap_or_default(),
            date: post.date.date(),
            content: preview(&post.content, PREVIEW_CHARS),
            followers: post.followers,
            views: post.views,
        }
    }
}

/// Everything derived from one (filtered) collection.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    /// Range the posts were filtered to, or the span of the data.
    pub date_range: Option<DateRange>,
    pub summary: Summary,
    pub sentiment: BTreeMap<SentimentCategory, usize>,
    pub words: Vec<(String, usize)>,
    pub phrases: Vec<(String, usize)>,
    pub hashtags: Vec<(String, usize)>,
    pub locations: Vec<(String, usize)>,
    pub metric: Metric,
    pub daily: Vec<(NaiveDate, f64)>,
    pub top_posts: Vec<TopPost>,
    /// Plain-text rendering, as printed by the CLI.
    #[serde(skip)]
    pub result: String,
    /// Files written by the export step.
    #[serde(skip)]
    pub exported: Vec<PathBuf>,
}

impl AnalysisReport {
    /// The report as exportable tables.
    pub fn tables(&self) -> Vec<Table> {
        vec![
            Table::counts("wordfreq", &self.words),
            Table::counts("ngrams", &self.phrases),
            Table::counts("hashtags", &self.hashtags),
            Table::counts("locations", &self.locations),
            Table {
                name: "sentiment",
                headers: vec!["category", "count"],
                rows: self
                    .sentiment
                    .iter()
                    .map(|(c, n)| vec![Cell::Text(c.to_string()), Cell::Int(*n as u64)])
                    .collect(),
            },
            Table {
                name: "daily",
                headers: vec!["date", self.metric.label()],
                rows: self
                    .daily
                    .iter()
                    .map(|(d, v)| vec![Cell::Text(d.to_string()), Cell::Float(*v)])
                    .collect(),
            },
            Table {
                name: "posts",
                headers: vec!["user_name", "date", "followers", "views", "content"],
                rows: self
                    .top_posts
                    .iter()
                    .map(|p| {
                        vec![
                            Cell::Text(p.user_name.clone()),
                            Cell::Text(p.date.to_string()),
                            Cell::Int(p.followers),
                            Cell::Int(p.views),
                            Cell::Text(p.content.clone()),
                        ]
                    })
                    .collect(),
            },
        ]
    }
}

/// Analyse already scored posts. Filtering by `options.date_range` happens
/// here; `posts` is left untouched.
pub fn analyze_posts(
    source: &str,
    posts: &[Post],
    analyzer: &PhraseAnalyzer,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let view: Vec<&Post> = match options.date_range {
        Some(range) => filter_by_date(posts, range),
        None => posts.iter().collect(),
    };
    if view.is_empty() {
        warn!("No posts in the selected range; mean sentiment is undefined");
    }

    let all_text = view
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let words = top(
        analyzer.word_frequency(&all_text, options.include_common),
        options.top_k,
    );
    let phrases = top(
        analyzer.analyze(&all_text, options.min_n, options.max_n, options.include_common)?,
        options.top_k,
    );

    let mut report = AnalysisReport {
        source: source.to_string(),
        date_range: options
            .date_range
            .or_else(|| DateRange::spanning(view.iter().copied())),
        summary: Summary::compute(view.iter().copied()),
        sentiment: sentiment_distribution(view.iter().copied()),
        words,
        phrases,
        hashtags: top(rank_by_count(post_hashtags(view.iter().copied())), options.top_k),
        locations: top(
            rank_by_count(aggregate_locations(view.iter().copied())),
            TOP_LOCATIONS,
        ),
        metric: options.metric,
        daily: daily_series(view.iter().copied(), options.metric)
            .into_iter()
            .collect(),
        top_posts: top_viewed(view.iter().copied(), TOP_POSTS)
            .into_iter()
            .map(TopPost::from)
            .collect(),
        result: String::new(),
        exported: Vec::new(),
    };
    report.result = render(&report, options);
    Ok(report)
}

/// Load, score, analyse and optionally export one CSV export.
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    stopwords: Option<&Path>,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let path = path.as_ref();
    let mut posts = load_posts(path)?;

    let scorer: SentimentScorer = SentimentScorer::default();
    scorer.score_posts(&mut posts);

    let mut analyzer = match &options.relevance_terms {
        Some(terms) => PhraseAnalyzer::with_terms(terms),
        None => PhraseAnalyzer::default(),
    };
    if let Some(file) = stopwords {
        let extra = load_stopword_file(file)?;
        info!("Using {} extra stopwords from {}", extra.len(), file.display());
        analyzer = analyzer.with_stopwords(extra);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "posts".to_string());
    let mut report = analyze_posts(&stem, &posts, &analyzer, options)?;

    if let Some(format) = options.export_format {
        report.exported = export_report(&report, &stem, &options.out_dir, format)?;
    }
    Ok(report)
}

fn render(report: &AnalysisReport, options: &AnalysisOptions) -> String {
    let s = &report.summary;
    let mut out = format!("== {} ==\n", report.source);

    match report.date_range {
        Some(r) => out.push_str(&format!(
            "Posts: {} ({} .. {})\n",
            s.total_posts, r.start, r.end
        )),
        None => out.push_str(&format!("Posts: {}\n", s.total_posts)),
    }
    out.push_str(&format!(
        "Views: {}  Reposts: {}  Followers: {}\n",
        s.total_views, s.total_reposts, s.total_followers
    ));
    match s.overall_category() {
        Some(c) => out.push_str(&format!("Mean sentiment: {:.2} ({c})\n", s.mean_sentiment)),
        None => out.push_str("Mean sentiment: n/a\n"),
    }
    let dist: Vec<String> = SentimentCategory::ALL
        .iter()
        .map(|c| format!("{c} {}", report.sentiment.get(c).copied().unwrap_or(0)))
        .collect();
    out.push_str(&format!("Sentiment: {}\n", dist.join(", ")));

    let k = options.top_k;
    push_ranked(&mut out, &format!("Top {k} words:"), "", &report.words);
    push_ranked(
        &mut out,
        &format!("Top {k} phrases ({}-{} words):", options.min_n, options.max_n),
        "",
        &report.phrases,
    );
    push_ranked(&mut out, &format!("Top {k} hashtags:"), "#", &report.hashtags);
    push_ranked(
        &mut out,
        &format!("Top {} locations:", report.locations.len()),
        "",
        &report.locations,
    );

    out.push_str(&format!("\nDaily {}:\n", report.metric));
    for (d, v) in &report.daily {
        out.push_str(&format!("  {d}\t{v:.2}\n"));
    }
    out.push_str(&format!("\nTop {} viewed posts:\n", report.top_posts.len()));
    for p in &report.top_posts {
        out.push_str(&format!(
            "  @{} {} views={} followers={}\n    {}\n",
            p.user_name, p.date, p.views, p.followers, p.content
        ));
    }
    out
}

fn push_ranked(out: &mut String, title: &str, prefix: &str, rows: &[(String, usize)]) {
    out.push_str(&format!("\n{title}\n"));
    for (item, n) in rows {
        out.push_str(&format!("  {prefix}{item}\t{n}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::load_posts_from_reader;

    const CSV: &str = "\
date,content,user name,location,replies,reposts,likes,views,followers
2024-09-13 09:00:00,Great results! #MARIPOSA #EGFR https://example.com overall survival,onc1,Barcelona,1,2,3,\"1,500\",\"2,000\"
2024-09-14 10:00:00,Overall survival data presented. Press release out. #egfr,onc2,,0,1,1,300,50
2024-09-15 11:00:00,Terrible toxicity concerns,onc3,Unknown,0,0,0,,10
";

    fn scored() -> Vec<Post> {
        let mut posts = load_posts_from_reader(CSV.as_bytes()).unwrap();
        let scorer: SentimentScorer = SentimentScorer::default();
        scorer.score_posts(&mut posts);
        posts
    }

    #[test]
    fn report_covers_every_table() {
        let posts = scored();
        let report =
            analyze_posts("sample", &posts, &PhraseAnalyzer::default(), &AnalysisOptions::default())
                .unwrap();
        assert_eq!(report.summary.total_posts, 3);
        assert_eq!(report.summary.total_views, 1800);
        assert_eq!(report.hashtags[0], ("egfr".to_string(), 2));
        assert!(report.locations.contains(&("Unknown".to_string(), 2)));
        assert_eq!(report.top_posts[0].views, 1500);
        assert_eq!(report.daily.len(), 3);
        assert_eq!(report.sentiment.values().sum::<usize>(), 3);
        assert_eq!(report.tables().len(), 7);
        assert!(report.result.contains("Top 15 hashtags:\n  #egfr\t2"));
        assert!(report.result.contains("\nTop 2 locations:\n  Unknown\t2\n  Barcelona\t1\n"));
    }

    #[test]
    fn locations_are_capped_at_ten() {
        let mut csv = String::from(
            "date,content,user name,location,replies,reposts,likes,views,followers\n",
        );
        for i in 0..12 {
            csv.push_str(&format!("2024-09-13,post,u{i},City{i:02},0,0,0,0,0\n"));
        }
        let posts = load_posts_from_reader(csv.as_bytes()).unwrap();
        let options = AnalysisOptions {
            top_k: 50,
            ..AnalysisOptions::default()
        };
        let report = analyze_posts("cities", &posts, &PhraseAnalyzer::default(), &options).unwrap();
        assert_eq!(report.locations.len(), TOP_LOCATIONS);
        assert_eq!(report.locations[0], ("City00".to_string(), 1));
        assert!(report.result.contains("Top 10 locations:"));
    }

    #[test]
    fn bigram_ranking_uses_relevance_then_phrase() {
        let posts = scored();
        let options = AnalysisOptions {
            min_n: 2,
            max_n: 2,
            top_k: 50,
            ..AnalysisOptions::default()
        };
        let report = analyze_posts("sample", &posts, &PhraseAnalyzer::default(), &options).unwrap();
        // every bigram touching a relevance term scores 7 and sorts by text
        assert_eq!(report.phrases[0], ("egfr overall".to_string(), 1));
        assert!(report.phrases.contains(&("overall survival".to_string(), 2)));
        let press = report.phrases.iter().position(|(p, _)| p == "press release").unwrap();
        let survival = report.phrases.iter().position(|(p, _)| p == "overall survival").unwrap();
        assert!(survival < press);
    }

    #[test]
    fn empty_range_reports_undefined_mean() {
        let posts = scored();
        let options = AnalysisOptions {
            date_range: Some(DateRange::new(
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            )),
            ..AnalysisOptions::default()
        };
        let report = analyze_posts("sample", &posts, &PhraseAnalyzer::default(), &options).unwrap();
        assert_eq!(report.summary.total_posts, 0);
        assert!(report.summary.mean_sentiment.is_nan());
        assert!(report.result.contains("Mean sentiment: n/a"));
        assert!(report.words.is_empty());
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn invalid_ngram_range_surfaces() {
        let posts = scored();
        let options = AnalysisOptions {
            min_n: 4,
            max_n: 2,
            ..AnalysisOptions::default()
        };
        assert!(analyze_posts("sample", &posts, &PhraseAnalyzer::default(), &options).is_err());
    }
}
