#![forbid(unsafe_code)]
//! # social_pulse CLI
//!
//! Command-line front end for the `social_pulse` crate. It loads a CSV export
//! of posts, scores sentiment, computes word/phrase/hashtag/location tables and
//! the headline metrics, prints a summary and optionally exports the tables.
//!
//! ## Example
//! ```bash
//! cargo run --release -- posts.csv --min-n 2 --max-n 3 --from 2024-09-13 --export-format csv
//! ```
//!
//! See `--help` for all available options.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use log::error;
use social_pulse::{AnalysisOptions, DateRange, ExportFormat, Metric, analyze_file};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// CSV export to analyze
    path: PathBuf,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Shortest phrase length in words (1 with --max-n 1 gives plain word counts)
    #[arg(long, default_value_t = 2)]
    min_n: usize,

    /// Longest phrase length in words
    #[arg(long, default_value_t = 5)]
    max_n: usize,

    /// Keep common terms such as "new", "update", "breaking" (default: false)
    #[arg(long, default_value_t = false)]
    include_common: bool,

    /// Number of rows per ranked table
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Metric for the daily series
    #[arg(long, value_enum, default_value_t = Metric::Views)]
    metric: Metric,

    /// Comma-separated relevance terms for phrase ranking (default: clinical terms)
    #[arg(long, value_delimiter = ',')]
    relevance_terms: Option<Vec<String>>,

    /// Output format for export (txt, csv, tsv, json); nothing is written if omitted
    #[arg(long)]
    export_format: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl Cli {
    fn options(&self) -> AnalysisOptions {
        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some(DateRange::new(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            )),
        };
        AnalysisOptions {
            min_n: self.min_n,
            max_n: self.max_n,
            include_common: self.include_common,
            top_k: self.top,
            date_range,
            metric: self.metric,
            relevance_terms: self.relevance_terms.clone(),
            export_format: self.export_format,
            out_dir: self.out_dir.clone(),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match analyze_file(&cli.path, cli.stopwords.as_deref(), &cli.options()) {
        Ok(report) => {
            println!("{}", report.result);
            for path in &report.exported {
                println!("Wrote {}", path.display());
            }
        }
        Err(e) => {
            error!("Error analyzing {}: {}", cli.path.display(), e);
            process::exit(1);
        }
    }
}
