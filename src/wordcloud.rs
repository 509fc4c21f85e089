//! Word-cloud sizing. Rasterizing is left to the client; this only decides
//! which keywords appear and how large.
//!
//! Sizes cascade down the ranked table: each word's size is the previous
//! size times `relative_scaling * (freq / prev_freq) + (1 - relative_scaling)`,
//! rounded to a whole point at every step, starting from `max_font_size`.
//! Words that would fall below `min_font_size` are dropped, as are words
//! past `max_words`.

use serde::Serialize;

use crate::config::WordCloudConfig;
use crate::keywords::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudWord {
    pub word: String,
    pub count: usize,
    /// Frequency relative to the top keyword, in (0, 1].
    pub weight: f64,
    pub font_size: u32,
}

pub fn layout(table: &FrequencyTable, cfg: &WordCloudConfig) -> Vec<CloudWord> {
    let max = table.max_count();
    if max == 0 {
        return Vec::new();
    }
    let rs = cfg.relative_scaling.clamp(0.0, 1.0);

    let mut out = Vec::new();
    let mut size = cfg.max_font_size;
    let mut prev_count: Option<usize> = None;

    for e in table.iter().take(cfg.max_words) {
        if let Some(prev) = prev_count {
            let scale = rs * (e.count as f64 / prev as f64) + (1.0 - rs);
            size = (size as f64 * scale).round() as u32;
        }
        if size < cfg.min_font_size {
            break;
        }
        out.push(CloudWord {
            word: e.word.clone(),
            count: e.count,
            weight: e.count as f64 / max as f64,
            font_size: size.min(cfg.max_font_size),
        });
        prev_count = Some(e.count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::StopwordSet;

    fn table(comments: &[&str]) -> FrequencyTable {
        FrequencyTable::from_comments(comments, StopwordSet::english())
    }

    #[test]
    fn empty_table_empty_cloud() {
        assert!(layout(&FrequencyTable::default(), &WordCloudConfig::default()).is_empty());
    }

    #[test]
    fn sizes_cascade_by_relative_frequency() {
        // alpha x4, beta x2, gamma x2
        let t = table(&["alpha alpha alpha alpha beta beta gamma gamma"]);
        let cloud = layout(&t, &WordCloudConfig::default());
        let sizes: Vec<u32> = cloud.iter().map(|w| w.font_size).collect();
        // 150, 150 * (0.5*0.5 + 0.5) = 112.5, then ratio 1 keeps it
        assert_eq!(sizes, vec![150, 113, 113]);
        assert_eq!(cloud[0].weight, 1.0);
        assert_eq!(cloud[1].weight, 0.5);
    }

    #[test]
    fn size_is_rounded_at_each_step() {
        // 150 -> 112.5 rounds to 113; 113 * 0.75 = 84.75 rounds to 85
        // (carrying the fraction would give 112.5 * 0.75 = 84.375 -> 84)
        let t = table(&["alpha alpha alpha alpha beta beta gamma delta"]);
        let sizes: Vec<u32> = layout(&t, &WordCloudConfig::default())
            .iter()
            .map(|w| w.font_size)
            .collect();
        assert_eq!(sizes, vec![150, 113, 85, 85]);
    }

    #[test]
    fn max_words_and_min_font_are_respected() {
        let t = table(&["one1 one1 one1 one1 one1 one1 one1 one1 two2 three3"]);
        let cfg = WordCloudConfig {
            max_words: 2,
            ..WordCloudConfig::default()
        };
        assert_eq!(layout(&t, &cfg).len(), 2);

        let strict = WordCloudConfig {
            relative_scaling: 1.0,
            min_font_size: 100,
            ..WordCloudConfig::default()
        };
        // second word would be 150 / 8 ≈ 19 < 100
        let cloud = layout(&t, &strict);
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud[0].word, "one1");
    }

    #[test]
    fn rank_only_scaling_keeps_max_size() {
        let t = table(&["aaa aaa aaa bbb"]);
        let cfg = WordCloudConfig {
            relative_scaling: 0.0,
            ..WordCloudConfig::default()
        };
        assert!(layout(&t, &cfg).iter().all(|w| w.font_size == 150));
    }
}
