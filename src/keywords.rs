//! # Keywords
//! Tokenizer, stopword set and the frequency-ranked keyword table.
//!
//! Tokens are maximal `\w+` runs of the lowercased text (Unicode-aware, so
//! `café` is one token and `_` counts as a word character). Keywords are
//! tokens longer than two characters that are not stopwords.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex"));

/// Function words excluded from keyword counting.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ma", "etc", "e.g",
    "i.e", "would", "could", "shall",
];

static ENGLISH: Lazy<StopwordSet> =
    Lazy::new(|| StopwordSet::from_words(ENGLISH_STOPWORDS.iter().copied()));

/// Lowercase `text` and split it into `\w+` tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A keyword candidate must be longer than two characters (not bytes).
#[inline]
fn long_enough(token: &str) -> bool {
    token.chars().count() > 2
}

/// Immutable set of lowercase stopwords.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn from_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Shared process-wide English list.
    pub fn english() -> &'static StopwordSet {
        &ENGLISH
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// One row of the keyword table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Keywords ranked by descending count; equal counts keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<KeywordCount>,
}

impl FrequencyTable {
    /// Count keywords across all comments.
    ///
    /// Comments are joined with a single space before tokenizing, so a token
    /// never spans two comments.
    pub fn from_comments<S: AsRef<str>>(comments: &[S], stopwords: &StopwordSet) -> Self {
        let joined = comments
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        // index into `entries` keeps insertion order for the stable sort below
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<KeywordCount> = Vec::new();

        for token in tokenize(&joined) {
            if !long_enough(&token) || stopwords.contains(&token) {
                continue;
            }
            match slots.get(&token) {
                Some(&i) => entries[i].count += 1,
                None => {
                    slots.insert(token.clone(), entries.len());
                    entries.push(KeywordCount {
                        word: token,
                        count: 1,
                    });
                }
            }
        }

        // sort_by is stable: ties stay in first-occurrence order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordCount> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[KeywordCount] {
        &self.entries
    }

    /// First `n` keywords (fewer if the table is shorter).
    pub fn top(&self, n: usize) -> &[KeywordCount] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn count(&self, word: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.word == word).map(|e| e.count)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.count(word).is_some()
    }

    /// Count of the leading keyword, 0 for an empty table.
    pub fn max_count(&self) -> usize {
        self.entries.first().map(|e| e.count).unwrap_or(0)
    }
}

/// Visual weight bucket of a keyword relative to the most frequent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    High,
    Medium,
    Low,
}

/// `High` above 70% of the maximum, `Medium` above 40%, otherwise `Low`.
pub fn intensity(count: usize, max_count: usize) -> Intensity {
    if max_count == 0 {
        return Intensity::Low;
    }
    let ratio = count as f64 / max_count as f64;
    if ratio > 0.7 {
        Intensity::High
    } else if ratio > 0.4 {
        Intensity::Medium
    } else {
        Intensity::Low
    }
}
