//! # Keyword index
//! "Which comments mention this keyword?" plus the highlighter used to
//! render a match.
//!
//! The two rules differ and stay that way:
//! - filtering is a case-insensitive *substring* test (`cat` matches `Cats`)
//! - highlighting marks only case-insensitive *whole words* (`**Cat**`, not `Cats`)

use regex::{Captures, Regex};
use tracing::debug;

/// Emphasis marker placed on both sides of a highlighted word.
pub const EMPHASIS: &str = "**";

/// Comments containing `word` case-insensitively, in original order.
///
/// Duplicated comments are returned as many times as they occur. An unknown
/// keyword yields an empty vector.
pub fn matching_comments<'a, S: AsRef<str>>(word: &str, comments: &'a [S]) -> Vec<&'a str> {
    matching_indices(word, comments)
        .into_iter()
        .map(|i| comments[i].as_ref())
        .collect()
}

/// Positions of the comments [`matching_comments`] would return.
pub fn matching_indices<S: AsRef<str>>(word: &str, comments: &[S]) -> Vec<usize> {
    let needle = word.to_lowercase();
    comments
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_ref().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Wrap every whole-word, case-insensitive occurrence of `word` in
/// [`EMPHASIS`], preserving the original casing.
pub fn highlight(text: &str, word: &str) -> String {
    Highlighter::new(word).apply(text)
}

/// Compiled highlight pattern, reusable across a keyword's matches.
#[derive(Debug, Clone)]
pub struct Highlighter {
    re: Option<Regex>,
}

impl Highlighter {
    pub fn new(word: &str) -> Self {
        if word.is_empty() {
            return Self { re: None };
        }
        let pattern = format!(r"(?i)\b({})\b", regex::escape(word));
        match Regex::new(&pattern) {
            Ok(re) => Self { re: Some(re) },
            Err(e) => {
                // only reachable for keywords exceeding the regex size limit
                debug!(error = %e, "highlight pattern rejected");
                Self { re: None }
            }
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.re {
            // closure replacer: `$` in comments is never treated as a group ref
            Some(re) => re
                .replace_all(text, |caps: &Captures<'_>| {
                    format!("{EMPHASIS}{}{EMPHASIS}", &caps[1])
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}
