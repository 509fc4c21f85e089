//! # Sentiment
//! Per-comment polarity scoring and the fixed three-way classification.
//!
//! The numeric score comes from a [`PolarityScorer`]. The shipped
//! [`LexiconScorer`] averages word polarities from an embedded lexicon,
//! scaling words after an intensifier and flipping (and halving) words that
//! follow a negator within three tokens.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Polarity strictly above this is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Polarity strictly below this is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Multiplier applied to a negated sentiment word.
const NEGATION_FACTOR: f64 = -0.5;
/// How many preceding tokens are searched for a negator.
const NEGATION_WINDOW: usize = 3;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

// keeps in-word apostrophes so "didn't" stays one token
static SENTIMENT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:'\w+)*").expect("sentiment token regex"));

/// The oracle seam: any deterministic text → polarity function.
///
/// Implementations should return a value in `[-1.0, 1.0]`; the analyzer
/// clamps anything else and replaces NaN or a panic with `0.0`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Human-readable label with its icon, as shown in lists and exports.
    pub fn display(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "😊 Positive",
            SentimentLabel::Neutral => "😐 Neutral",
            SentimentLabel::Negative => "😞 Negative",
        }
    }

    /// Styling class tag for front-ends.
    pub fn class(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Inverse of [`SentimentLabel::display`]; also accepts the bare name.
    pub fn parse_display(s: &str) -> Option<Self> {
        let name = s.trim().rsplit(' ').next().unwrap_or_default();
        match name.to_ascii_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub polarity: f64,
}

impl SentimentResult {
    pub fn from_polarity(polarity: f64) -> Self {
        Self {
            label: SentimentLabel::from_polarity(polarity),
            polarity,
        }
    }

    pub fn neutral() -> Self {
        Self::from_polarity(0.0)
    }

    pub fn class(&self) -> &'static str {
        self.label.class()
    }
}

/// Lexicon/rule based scorer backed by `sentiment_lexicon.json`.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_polarity(&self, w: &str) -> Option<f64> {
        LEXICON.get(w).copied()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = sentiment_tokens(text);
        let mut scored: Vec<f64> = Vec::new();

        for i in 0..tokens.len() {
            let Some(base) = self.word_polarity(&tokens[i]) else {
                continue;
            };

            let mut p = base;
            if i > 0 {
                if let Some(m) = intensifier(&tokens[i - 1]) {
                    p *= m;
                }
            }
            let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(&tokens[i - k]));
            if negated {
                p *= NEGATION_FACTOR;
            }
            scored.push(p);
        }

        if scored.is_empty() {
            return 0.0;
        }
        let mean = scored.iter().sum::<f64>() / scored.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Lowercased tokens with typographic apostrophes folded to ASCII.
fn sentiment_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    SENTIMENT_TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn intensifier(tok: &str) -> Option<f64> {
    let m = match tok {
        "very" | "really" | "so" | "truly" | "highly" => 1.3,
        "extremely" | "incredibly" | "absolutely" | "totally" => 1.5,
        "quite" | "pretty" => 1.1,
        "slightly" | "somewhat" => 0.5,
        "bit" => 0.7,
        _ => return None,
    };
    Some(m)
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "none" | "nothing" | "nobody" | "without" | "cannot" | "hardly"
    ) || tok.ends_with("n't")
}

/// Classifier wrapper around an oracle, made total.
#[derive(Clone)]
pub struct SentimentAnalyzer {
    scorer: Arc<dyn PolarityScorer>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalyzer").finish_non_exhaustive()
    }
}

impl SentimentAnalyzer {
    /// Analyzer using the embedded lexicon.
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(LexiconScorer::new()))
    }

    pub fn with_scorer(scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    /// Score and label one comment. Never panics; a failing oracle yields
    /// Neutral / 0.0.
    pub fn classify(&self, text: &str) -> SentimentResult {
        let scorer = &self.scorer;
        match panic::catch_unwind(AssertUnwindSafe(|| scorer.polarity(text))) {
            Ok(p) if p.is_finite() => SentimentResult::from_polarity(p.clamp(-1.0, 1.0)),
            Ok(p) => {
                warn!(polarity = p, "sentiment oracle returned a non-finite score");
                counter!("sentiment_oracle_failures_total").increment(1);
                SentimentResult::neutral()
            }
            Err(_) => {
                warn!("sentiment oracle panicked; substituting neutral");
                counter!("sentiment_oracle_failures_total").increment(1);
                SentimentResult::neutral()
            }
        }
    }
}
