// src/config.rs
//! Dashboard configuration (`config/dashboard.toml`).
//!
//! Resolution order:
//! 1) `$DASHBOARD_CONFIG_PATH` (must exist)
//! 2) `config/dashboard.toml`
//! 3) built-in defaults

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";
pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub display: DisplayConfig,
    pub wordcloud: WordCloudConfig,
    pub ingest: IngestConfig,
}

/// List sizes used by the comment and keyword views.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub recent_comments: usize,
    pub keyword_list: usize,
    pub top_keywords: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_comments: 20,
            keyword_list: 30,
            top_keywords: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub max_words: usize,
    /// 0.0 = size by rank only, 1.0 = size proportional to frequency.
    pub relative_scaling: f64,
    pub min_font_size: u32,
    pub max_font_size: u32,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            max_words: 150,
            relative_scaling: 0.5,
            min_font_size: 10,
            max_font_size: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_upload_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: DashboardConfig = toml::from_str(s).context("parsing dashboard config")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Env path, then the default file, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default())
    }

    /// Replace nonsensical values instead of failing.
    fn sanitized(mut self) -> Self {
        let d = DisplayConfig::default();
        if self.display.recent_comments == 0 {
            self.display.recent_comments = d.recent_comments;
        }
        if self.display.keyword_list == 0 {
            self.display.keyword_list = d.keyword_list;
        }
        if self.display.top_keywords == 0 {
            self.display.top_keywords = d.top_keywords;
        }

        let w = &mut self.wordcloud;
        if w.max_words == 0 {
            w.max_words = WordCloudConfig::default().max_words;
        }
        if !w.relative_scaling.is_finite() {
            w.relative_scaling = WordCloudConfig::default().relative_scaling;
        }
        w.relative_scaling = w.relative_scaling.clamp(0.0, 1.0);
        if w.min_font_size > w.max_font_size {
            std::mem::swap(&mut w.min_font_size, &mut w.max_font_size);
        }
        w.min_font_size = w.min_font_size.max(1);
        w.max_font_size = w.max_font_size.max(w.min_font_size);

        if self.ingest.max_upload_bytes == 0 {
            self.ingest.max_upload_bytes = IngestConfig::default().max_upload_bytes;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = DashboardConfig::from_toml_str("[display]\nrecent_comments = 5\n").unwrap();
        assert_eq!(cfg.display.recent_comments, 5);
        assert_eq!(cfg.display.keyword_list, 30);
        assert_eq!(cfg.wordcloud, WordCloudConfig::default());
    }

    #[test]
    fn bad_values_are_sanitized() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
[display]
top_keywords = 0

[wordcloud]
relative_scaling = 3.0
min_font_size = 200
max_font_size = 20
"#,
        )
        .unwrap();
        assert_eq!(cfg.display.top_keywords, 15);
        assert_eq!(cfg.wordcloud.relative_scaling, 1.0);
        assert_eq!(cfg.wordcloud.min_font_size, 20);
        assert_eq!(cfg.wordcloud.max_font_size, 200);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(DashboardConfig::from_toml_str("[display\n").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // isolate CWD so the repo's config/ does not interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        assert_eq!(DashboardConfig::load_default().unwrap(), DashboardConfig::default());

        let p = tmp.path().join("custom.toml");
        fs::write(&p, "[ingest]\nmax_upload_bytes = 1024\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        assert_eq!(
            DashboardConfig::load_default().unwrap().ingest.max_upload_bytes,
            1024
        );

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
        assert!(DashboardConfig::load_default().is_err());

        env::remove_var(ENV_CONFIG_PATH);
        env::set_current_dir(&old).unwrap();
    }
}
