//! Writing report tables to disk as txt, csv, tsv or json.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::ValueEnum;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::error::{AnalyticsError, Result};
use crate::report::AnalysisReport;

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Plain-text summary (same as stdout)
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// Neutralize spreadsheet formula injection: cells starting with `=`, `+`,
/// `-`, `@`, tab or carriage return get a leading `'`. Cells that already
/// start with `'` are left alone.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// One exported cell. Text is sanitized for csv/tsv; numbers stay numbers in
/// json.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(u64),
    Float(f64),
}

impl Cell {
    fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => csv_safe_cell(s.clone()),
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) => f.to_string(),
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Cell::Text(s) => Json::String(s.clone()),
            Cell::Int(n) => Json::from(*n),
            Cell::Float(f) => Json::from(*f),
        }
    }
}

/// A named table with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Two-column `item,count` table from a ranked list.
    pub fn counts(name: &'static str, ranked: &[(String, usize)]) -> Self {
        Self {
            name,
            headers: vec!["item", "count"],
            rows: ranked
                .iter()
                .map(|(item, count)| vec![Cell::Text(item.clone()), Cell::Int(*count as u64)])
                .collect(),
        }
    }

    fn write_delimited(&self, path: &Path, delimiter: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(Cell::to_field))?;
        }
        wtr.flush().map_err(|e| AnalyticsError::io(path, e))?;
        Ok(())
    }

    fn write_json(&self, path: &Path) -> Result<()> {
        let rows: Vec<Json> = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Json> = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(h, c)| (h.to_string(), c.to_json()))
                    .collect();
                Json::Object(obj)
            })
            .collect();
        let file = File::create(path).map_err(|e| AnalyticsError::io(path, e))?;
        serde_json::to_writer_pretty(file, &rows)?;
        Ok(())
    }
}

/// Write the report to `out_dir`. Files are named
/// `<stem>_<YYYYMMDD_HHMMSS>_<table>.<ext>`; txt writes one `summary` file,
/// the other formats one file per table. Returns the written paths.
pub fn export_report(
    report: &AnalysisReport,
    stem: &str,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| AnalyticsError::io(out_dir, e))?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let file_for = |table: &str| out_dir.join(format!("{stem}_{stamp}_{table}.{}", format.extension()));

    let mut written = Vec::new();
    let delimiter = match format {
        ExportFormat::Txt => {
            let path = file_for("summary");
            let mut file = File::create(&path).map_err(|e| AnalyticsError::io(&path, e))?;
            file.write_all(report.result.as_bytes())
                .map_err(|e| AnalyticsError::io(&path, e))?;
            written.push(path);
            None
        }
        ExportFormat::Csv => Some(b','),
        ExportFormat::Tsv => Some(b'\t'),
        ExportFormat::Json => None,
    };
    if format != ExportFormat::Txt {
        for table in report.tables() {
            let path = file_for(table.name);
            match delimiter {
                Some(d) => table.write_delimited(&path, d)?,
                None => table.write_json(&path)?,
            }
            written.push(path);
        }
    }
    info!("Exported {} file(s) to {}", written.len(), out_dir.display());
    Ok(written)
}
