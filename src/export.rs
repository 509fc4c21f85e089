//! # Export
//! CSV serialization of a batch: `comment,sentiment,polarity`, one row per
//! comment in original order.

use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::Deserialize;

use crate::sentiment::{SentimentLabel, SentimentResult};

pub const EXPORT_HEADER: [&str; 3] = ["comment", "sentiment", "polarity"];
pub const EXPORT_FILE_NAME: &str = "complete_analysis.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A parsed export row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportRow {
    pub comment: String,
    pub sentiment: String,
    pub polarity: f64,
}

impl ExportRow {
    pub fn label(&self) -> Option<SentimentLabel> {
        SentimentLabel::parse_display(&self.sentiment)
    }
}

/// Serialize `(comment, result)` pairs. The header is always written, so an
/// empty batch exports as the header line alone.
pub fn to_csv<'a, I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a SentimentResult)>,
{
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADER)
        .context("writing export header")?;
    for (comment, result) in rows {
        // `{}` on f64 prints the shortest representation that round-trips
        let polarity = result.polarity.to_string();
        wtr.write_record([comment, result.label.display(), polarity.as_str()])
            .context("writing export row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing export buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("export is not valid UTF-8")
}

/// Parse an export produced by [`to_csv`].
pub fn parse_csv(text: &str) -> Result<Vec<ExportRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().context("reading export header")?.clone();
    if headers.iter().ne(EXPORT_HEADER.iter().copied()) {
        anyhow::bail!("unexpected export header: {:?}", headers);
    }

    rdr.deserialize::<ExportRow>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("parsing export row {}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&'static str, f64)]) -> Vec<(&'static str, SentimentResult)> {
        items
            .iter()
            .map(|&(c, p)| (c, SentimentResult::from_polarity(p)))
            .collect()
    }

    fn export(items: &[(&'static str, SentimentResult)]) -> String {
        to_csv(items.iter().map(|(c, r)| (*c, r))).unwrap()
    }

    #[test]
    fn empty_batch_is_header_only() {
        assert_eq!(export(&[]), "comment,sentiment,polarity\n");
    }

    #[test]
    fn rows_follow_input_order_with_icon_labels() {
        let csv = export(&pairs(&[("I love this", 0.5), ("I hate this", -0.8)]));
        assert_eq!(
            csv,
            "comment,sentiment,polarity\nI love this,😊 Positive,0.5\nI hate this,😞 Negative,-0.8\n"
        );
    }

    #[test]
    fn embedded_delimiters_are_quoted() {
        let csv = export(&pairs(&[("Fast, cheap \"and\"\ngood", 0.0)]));
        assert!(csv.contains("\"Fast, cheap \"\"and\"\"\ngood\""), "{csv}");
    }

    #[test]
    fn export_then_parse_recovers_rows() {
        let items = pairs(&[
            ("plain", 0.0),
            ("with, comma", 0.3333333333333333),
            ("multi\nline \"quoted\"", -0.45),
            ("  padded  ", 1.0),
            ("", 0.0),
        ]);
        let rows = parse_csv(&export(&items)).unwrap();
        assert_eq!(rows.len(), items.len());
        for (row, (comment, result)) in rows.iter().zip(items.iter()) {
            assert_eq!(row.comment, *comment);
            assert_eq!(row.label(), Some(result.label));
            assert_eq!(row.polarity, result.polarity);
        }
    }

    #[test]
    fn parse_rejects_foreign_header() {
        assert!(parse_csv("text,score\nhi,1\n").is_err());
    }
}
