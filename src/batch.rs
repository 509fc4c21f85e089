//! # Analysis batch
//! The working set of one analysis run: comments, one sentiment result per
//! comment, the keyword table and the aggregated counts.
//!
//! Everything is computed once in [`AnalysisBatch::build`] and read many
//! times afterwards; `comments[i]` always corresponds to `sentiments[i]`.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::aggregate::SentimentCounts;
use crate::export;
use crate::ingest::DataSource;
use crate::keyword_index::{matching_indices, Highlighter};
use crate::keywords::{FrequencyTable, StopwordSet};
use crate::sentiment::{SentimentAnalyzer, SentimentResult};

/// Below this size scoring stays on the calling thread.
const PARALLEL_MIN: usize = 256;

#[derive(Debug, Clone)]
pub struct AnalysisBatch {
    id: String,
    created_at: DateTime<Utc>,
    source: DataSource,
    comments: Vec<String>,
    sentiments: Vec<SentimentResult>,
    keywords: FrequencyTable,
    counts: SentimentCounts,
}

/// A comment with its sentiment, by position in the batch.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord<'a> {
    pub index: usize,
    pub comment: &'a str,
    pub sentiment: SentimentResult,
}

/// A keyword match ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMatch {
    pub index: usize,
    pub comment: String,
    pub highlighted: String,
    pub sentiment: SentimentResult,
}

impl AnalysisBatch {
    pub fn build(
        source: DataSource,
        comments: Vec<String>,
        analyzer: &SentimentAnalyzer,
        stopwords: &StopwordSet,
    ) -> Self {
        let sentiments = score_all(&comments, analyzer);
        let keywords = FrequencyTable::from_comments(&comments, stopwords);
        let counts = SentimentCounts::from_results(&sentiments);

        Self {
            id: fingerprint(&comments),
            created_at: Utc::now(),
            source,
            comments,
            sentiments,
            keywords,
            counts,
        }
    }

    /// Short SHA-256 fingerprint of the comments; safe to log.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn sentiments(&self) -> &[SentimentResult] {
        &self.sentiments
    }

    pub fn keywords(&self) -> &FrequencyTable {
        &self.keywords
    }

    pub fn counts(&self) -> SentimentCounts {
        self.counts
    }

    pub fn records(&self) -> impl Iterator<Item = CommentRecord<'_>> {
        self.comments
            .iter()
            .zip(self.sentiments.iter())
            .enumerate()
            .map(|(index, (comment, sentiment))| CommentRecord {
                index,
                comment,
                sentiment: *sentiment,
            })
    }

    /// The first `limit` comments, as the "recent comments" list shows them.
    pub fn recent(&self, limit: usize) -> Vec<CommentRecord<'_>> {
        self.records().take(limit).collect()
    }

    /// Comments containing `word` (substring), highlighted on whole words.
    pub fn matches(&self, word: &str) -> Vec<KeywordMatch> {
        let hl = Highlighter::new(word);
        matching_indices(word, &self.comments)
            .into_iter()
            .map(|i| KeywordMatch {
                index: i,
                comment: self.comments[i].clone(),
                highlighted: hl.apply(&self.comments[i]),
                sentiment: self.sentiments[i],
            })
            .collect()
    }

    pub fn to_csv(&self) -> anyhow::Result<String> {
        export::to_csv(
            self.comments
                .iter()
                .map(String::as_str)
                .zip(self.sentiments.iter()),
        )
    }
}

/// Classify every comment; results keep input order.
fn score_all(comments: &[String], analyzer: &SentimentAnalyzer) -> Vec<SentimentResult> {
    if comments.len() < PARALLEL_MIN {
        return comments.iter().map(|c| analyzer.classify(c)).collect();
    }
    // indexed parallel iterator: collect() preserves positions
    comments.par_iter().map(|c| analyzer.classify(c)).collect()
}

pub(crate) fn fingerprint(comments: &[String]) -> String {
    let mut hasher = Sha256::new();
    for c in comments {
        hasher.update(c.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentLabel;

    fn build(comments: &[&str]) -> AnalysisBatch {
        AnalysisBatch::build(
            DataSource::Sample,
            comments.iter().map(|s| s.to_string()).collect(),
            &SentimentAnalyzer::new(),
            StopwordSet::english(),
        )
    }

    #[test]
    fn love_hate_counts() {
        let b = build(&["I love this", "I hate this"]);
        assert_eq!(b.sentiments()[0].label, SentimentLabel::Positive);
        assert_eq!(b.sentiments()[1].label, SentimentLabel::Negative);
        assert_eq!(
            b.counts(),
            SentimentCounts {
                positive: 1,
                neutral: 0,
                negative: 1
            }
        );
    }

    #[test]
    fn empty_batch_derives_empty_structures() {
        let b = build(&[]);
        assert!(b.is_empty());
        assert!(b.keywords().is_empty());
        assert_eq!(b.counts(), SentimentCounts::default());
        assert_eq!(b.to_csv().unwrap(), "comment,sentiment,polarity\n");
        assert!(b.matches("anything").is_empty());
    }

    #[test]
    fn parallel_scoring_keeps_positions() {
        let mut comments = Vec::new();
        for i in 0..(PARALLEL_MIN * 2 + 7) {
            comments.push(if i % 3 == 0 {
                format!("terrible awful {i}")
            } else {
                format!("excellent {i}")
            });
        }
        let b = AnalysisBatch::build(
            DataSource::Sample,
            comments.clone(),
            &SentimentAnalyzer::new(),
            StopwordSet::english(),
        );
        let a = SentimentAnalyzer::new();
        for (i, c) in comments.iter().enumerate() {
            assert_eq!(b.sentiments()[i], a.classify(c), "position {i}");
        }
    }

    #[test]
    fn matches_pair_comment_with_its_sentiment() {
        let b = build(&["The cat sat", "A dog barked", "Cats are nice"]);
        let m = b.matches("cat");
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].index, 0);
        assert_eq!(m[0].highlighted, "The **cat** sat");
        assert_eq!(m[1].index, 2);
        assert_eq!(m[1].highlighted, "Cats are nice");
        assert_eq!(m[1].sentiment, b.sentiments()[2]);
    }

    #[test]
    fn recent_is_a_prefix() {
        let b = build(&["a", "b", "c"]);
        let r = b.recent(2);
        assert_eq!(r.len(), 2);
        assert_eq!(r[1].comment, "b");
        assert_eq!(b.recent(10).len(), 3);
    }

    #[test]
    fn fingerprint_depends_on_boundaries() {
        let a = fingerprint(&["ab".to_string(), "c".to_string()]);
        let b = fingerprint(&["a".to_string(), "bc".to_string()]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn export_round_trips() {
        let b = build(&["Great, fast delivery", "Broken on arrival\nvery bad", "ok"]);
        let rows = export::parse_csv(&b.to_csv().unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
        for (row, rec) in rows.iter().zip(b.records()) {
            assert_eq!(row.comment, rec.comment);
            assert_eq!(row.label(), Some(rec.sentiment.label));
            assert_eq!(row.polarity, rec.sentiment.polarity);
        }
    }
}
