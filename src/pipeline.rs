//! One analysis run end to end: ingestion, scoring, keyword counting and
//! telemetry. Synchronous; callers on the async runtime should wrap it in
//! `spawn_blocking`.

use std::time::Instant;
use tracing::info;

use crate::batch::AnalysisBatch;
use crate::ingest::{self, DataSource};
use crate::keywords::StopwordSet;
use crate::metrics::record_analysis;
use crate::sentiment::SentimentAnalyzer;

pub fn run(
    source: DataSource,
    content: Option<&[u8]>,
    analyzer: &SentimentAnalyzer,
) -> AnalysisBatch {
    let started = Instant::now();

    let comments = ingest::load(&source, content);
    let batch = AnalysisBatch::build(source, comments, analyzer, StopwordSet::english());

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let counts = batch.counts();
    record_analysis(batch.len(), counts, elapsed_ms);

    // never log raw comments; the batch id is a hash
    info!(
        batch = batch.id(),
        source = %batch.source(),
        comments = batch.len(),
        keywords = batch.keywords().len(),
        positive = counts.positive,
        neutral = counts.neutral,
        negative = counts.negative,
        elapsed_ms,
        "analysis complete"
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_run_scores_every_comment() {
        let b = run(DataSource::Sample, None, &SentimentAnalyzer::new());
        assert_eq!(b.len(), ingest::sample_comments().len());
        assert_eq!(b.sentiments().len(), b.len());
        assert_eq!(b.counts().total(), b.len());
        assert!(!b.keywords().is_empty());
    }

    #[test]
    fn unreadable_upload_gives_empty_batch() {
        let src = DataSource::Upload {
            filename: "sheet.xlsx".into(),
        };
        let b = run(src, Some(&b"\x00\x01"[..]), &SentimentAnalyzer::new());
        assert!(b.is_empty());
        assert!(b.keywords().is_empty());
        assert_eq!(b.counts().total(), 0);
    }
}
