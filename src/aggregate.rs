//! # Aggregate
//! Batch-level sentiment counts, percentages and the pie-chart distribution.

use serde::Serialize;

use crate::sentiment::{SentimentLabel, SentimentResult};

/// Order in which labels are reported (metric cards, pie slices).
pub const LABEL_ORDER: [SentimentLabel; 3] = [
    SentimentLabel::Positive,
    SentimentLabel::Neutral,
    SentimentLabel::Negative,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn from_results(results: &[SentimentResult]) -> Self {
        let mut c = Self::default();
        for r in results {
            c.add(r.label);
        }
        c
    }

    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Shares in percent, rounded to one decimal. All zero for an empty batch.
    pub fn percentages(&self) -> SentimentPercentages {
        let total = self.total();
        SentimentPercentages {
            positive: percent(self.positive, total),
            neutral: percent(self.neutral, total),
            negative: percent(self.negative, total),
        }
    }

    /// Pie slices in [`LABEL_ORDER`].
    pub fn distribution(&self) -> Vec<Slice> {
        let total = self.total();
        LABEL_ORDER
            .iter()
            .map(|&label| {
                let count = self.get(label);
                Slice {
                    label,
                    name: label_name(label),
                    count,
                    percent: percent(count, total),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentPercentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// One pie-chart wedge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: SentimentLabel,
    pub name: &'static str,
    pub count: usize,
    pub percent: f64,
}

fn label_name(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Positive",
        SentimentLabel::Neutral => "Neutral",
        SentimentLabel::Negative => "Negative",
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / total as f64, 1)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(ps: &[f64]) -> Vec<SentimentResult> {
        ps.iter().map(|&p| SentimentResult::from_polarity(p)).collect()
    }

    #[test]
    fn counts_by_label() {
        let c = SentimentCounts::from_results(&results(&[0.5, -0.8, 0.0, 0.21, 0.2]));
        assert_eq!(
            c,
            SentimentCounts {
                positive: 2,
                neutral: 2,
                negative: 1
            }
        );
        assert_eq!(c.total(), 5);
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let c = SentimentCounts::from_results(&[]);
        assert_eq!(c, SentimentCounts::default());
        assert_eq!(c.percentages(), SentimentPercentages::default());
        assert!(c.distribution().iter().all(|s| s.count == 0 && s.percent == 0.0));
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let c = SentimentCounts {
            positive: 1,
            neutral: 1,
            negative: 1,
        };
        let p = c.percentages();
        assert_eq!(p.positive, 33.3);
        assert_eq!(p.neutral, 33.3);
        assert_eq!(p.negative, 33.3);
    }

    #[test]
    fn distribution_order_is_fixed() {
        let c = SentimentCounts {
            positive: 3,
            neutral: 0,
            negative: 1,
        };
        let names: Vec<&str> = c.distribution().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Positive", "Neutral", "Negative"]);
        assert_eq!(c.distribution()[0].percent, 75.0);
        assert_eq!(c.distribution()[2].percent, 25.0);
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(-0.4567, 3), -0.457);
    }
}
