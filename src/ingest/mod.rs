// src/ingest/mod.rs
//! Turning an uploaded file (or nothing) into a list of raw comments.
//!
//! Ingestion never fails outward: unreadable or unsupported input is logged
//! and produces an empty list, which the rest of the pipeline accepts.

pub mod csv_file;
pub mod sample;
pub mod spreadsheet;
pub mod text_file;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{info, warn};

pub use sample::sample_comments;

/// Preferred comment-bearing column names, first exact match wins.
pub const COMMENT_COLUMNS: [&str; 7] = [
    "comment", "comments", "text", "feedback", "review", "message", "content",
];

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_failures_total",
            "Uploads that produced no comments because they could not be read."
        );
    });
}

/// Where a batch's comments came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    Sample,
    Upload { filename: String },
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Sample => write!(f, "sample"),
            DataSource::Upload { filename } => write!(f, "upload:{filename}"),
        }
    }
}

/// File formats recognized by extension (case-sensitive, like the upload widget).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Text,
    Spreadsheet,
    Unknown,
}

impl FileKind {
    pub fn from_filename(name: &str) -> Self {
        if name.ends_with(".csv") {
            FileKind::Csv
        } else if name.ends_with(".txt") {
            FileKind::Text
        } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
            FileKind::Spreadsheet
        } else {
            FileKind::Unknown
        }
    }
}

/// Extract comments from an uploaded file. Failures yield an empty list.
pub fn load_comments(filename: &str, bytes: &[u8]) -> Vec<String> {
    ensure_metrics_described();

    let kind = FileKind::from_filename(filename);
    let parsed = match kind {
        FileKind::Csv => csv_file::parse(bytes),
        FileKind::Text => text_file::parse(bytes),
        FileKind::Spreadsheet => spreadsheet::parse(bytes),
        FileKind::Unknown => Err(anyhow::anyhow!("unrecognized file extension")),
    };

    match parsed {
        Ok(comments) => {
            info!(filename, ?kind, comments = comments.len(), "upload parsed");
            comments
        }
        Err(e) => {
            warn!(error = ?e, filename, ?kind, "upload unreadable; continuing with no comments");
            counter!("ingest_failures_total").increment(1);
            Vec::new()
        }
    }
}

/// Name given to uploads that arrive without one.
pub const DEFAULT_UPLOAD_NAME: &str = "upload.txt";

impl DataSource {
    /// Upload when content is present, the sample corpus otherwise.
    pub fn from_request(filename: Option<&str>, has_content: bool) -> Self {
        if has_content {
            DataSource::Upload {
                filename: filename.unwrap_or(DEFAULT_UPLOAD_NAME).to_string(),
            }
        } else {
            DataSource::Sample
        }
    }
}

/// Comments for `source`. An upload source without content yields nothing.
pub fn load(source: &DataSource, content: Option<&[u8]>) -> Vec<String> {
    match source {
        DataSource::Sample => sample_comments(),
        DataSource::Upload { filename } => load_comments(filename, content.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_by_extension() {
        assert_eq!(FileKind::from_filename("a.csv"), FileKind::Csv);
        assert_eq!(FileKind::from_filename("a.txt"), FileKind::Text);
        assert_eq!(FileKind::from_filename("a.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_filename("a.xls"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_filename("a.CSV"), FileKind::Unknown);
        assert_eq!(FileKind::from_filename("a.json"), FileKind::Unknown);
    }

    #[test]
    fn unreadable_formats_degrade_to_empty() {
        assert!(load_comments("book.xlsx", b"PK\x03\x04").is_empty());
        assert!(load_comments("data.bin", b"whatever").is_empty());
    }

    #[test]
    fn workbook_upload_reads_comment_column() {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "id").unwrap();
        ws.write_string(0, 1, "comment").unwrap();
        ws.write_string(1, 0, "1").unwrap();
        ws.write_string(1, 1, "Love the new design").unwrap();
        ws.write_string(2, 0, "2").unwrap();
        ws.write_string(2, 1, "Checkout keeps failing").unwrap();
        let bytes = wb.save_to_buffer().unwrap();

        assert_eq!(
            load_comments("survey.xlsx", &bytes),
            vec!["Love the new design", "Checkout keeps failing"]
        );
    }

    #[test]
    fn invalid_utf8_text_degrades_to_empty() {
        assert!(load_comments("notes.txt", &[0xff, 0xfe, 0xfd]).is_empty());
    }

    #[test]
    fn load_prefers_upload_then_sample() {
        let content = &b"one\n\ntwo\n"[..];
        let src = DataSource::from_request(Some("c.txt"), true);
        assert_eq!(
            src,
            DataSource::Upload {
                filename: "c.txt".into()
            }
        );
        assert_eq!(load(&src, Some(content)), vec!["one", "two"]);

        let src = DataSource::from_request(None, false);
        assert_eq!(src, DataSource::Sample);
        assert_eq!(load(&src, None), sample_comments());
    }

    #[test]
    fn unnamed_upload_is_treated_as_text() {
        let src = DataSource::from_request(None, true);
        assert_eq!(
            src,
            DataSource::Upload {
                filename: DEFAULT_UPLOAD_NAME.into()
            }
        );
        assert_eq!(load(&src, Some(&b"hello there"[..])), vec!["hello there"]);
    }

    #[test]
    fn upload_source_without_content_is_empty() {
        let src = DataSource::Upload {
            filename: "c.txt".into(),
        };
        assert!(load(&src, None).is_empty());
    }

    #[test]
    fn source_display() {
        assert_eq!(DataSource::Sample.to_string(), "sample");
        assert_eq!(
            DataSource::Upload {
                filename: "x.csv".into()
            }
            .to_string(),
            "upload:x.csv"
        );
    }
}
