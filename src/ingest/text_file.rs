// src/ingest/text_file.rs
use anyhow::{Context, Result};

/// One comment per non-empty line, trimmed. Input must be UTF-8.
pub fn parse(bytes: &[u8]) -> Result<Vec<String>> {
    let content = std::str::from_utf8(bytes).context("text upload is not UTF-8")?;
    Ok(content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_blank_lines() {
        let out = parse(b"  first  \r\n\n\t\nsecond\nthird").unwrap();
        assert_eq!(out, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_file_is_ok() {
        assert!(parse(b"").unwrap().is_empty());
    }
}
