//! Configuration loading for verseq.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "VERSEQ_CONFIG";

/// Default number of search results printed by the CLI.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Location of the verse corpus file.
#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_path")]
    pub path: String,
}

/// Search defaults.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_corpus_path() -> String {
    "./verses-1769.json".to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

impl Config {
    /// Load config from `$VERSEQ_CONFIG` or ~/.config/verseq/config.toml,
    /// or return defaults if neither exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        Ok(Config::default())
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "verseq").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The configured corpus path with `~` expanded.
    #[must_use]
    pub fn corpus_path(&self) -> PathBuf {
        expand_tilde(&self.corpus.path)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.corpus.path, "./verses-1769.json");
        assert_eq!(config.search.limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str("[corpus]\npath = \"/data/kjv.json\"\n").unwrap();
        assert_eq!(config.corpus.path, "/data/kjv.json");
        assert_eq!(config.search.limit, DEFAULT_SEARCH_LIMIT);

        let config: Config = toml::from_str("[search]\nlimit = 5\n").unwrap();
        assert_eq!(config.search.limit, 5);
        assert_eq!(config.corpus.path, "./verses-1769.json");
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.search.limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/abs/path.json"), PathBuf::from("/abs/path.json"));
        assert_eq!(expand_tilde("rel.json"), PathBuf::from("rel.json"));
    }

    #[test]
    fn expand_tilde_uses_home() {
        let expanded = expand_tilde("~/verses.json");
        if BaseDirs::new().is_some() {
            assert!(!expanded.starts_with("~"));
            assert!(expanded.ends_with("verses.json"));
        }
    }
}
