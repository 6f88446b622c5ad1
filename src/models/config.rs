//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Hornbostel-Sachs classification vocabulary
    #[serde(default = "defaults::classification")]
    pub classification: VocabularyConfig,

    /// Instrument keyword vocabulary used for translations
    #[serde(default = "defaults::translation")]
    pub translation: VocabularyConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.min_delay_ms > self.crawler.max_delay_ms {
            return Err(AppError::validation(
                "crawler.min_delay_ms must not exceed crawler.max_delay_ms",
            ));
        }
        if self.crawler.lang.trim().is_empty() {
            return Err(AppError::validation("crawler.lang is empty"));
        }
        self.classification.validate("classification")?;
        self.translation.validate("translation")?;
        if self
            .translation
            .root_page
            .as_deref()
            .is_none_or(|page| page.trim().is_empty())
        {
            return Err(AppError::validation("translation.root_page is required"));
        }
        Ok(())
    }

    /// Full path of an output file inside the configured output directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output.dir).join(file_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            classification: defaults::classification(),
            translation: defaults::translation(),
            output: OutputConfig::default(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Lower bound of the random pause between requests, in milliseconds
    #[serde(default = "defaults::min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound of the random pause between requests, in milliseconds
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,

    /// Stop after this many visited concepts (unlimited when absent)
    #[serde(default)]
    pub max_count: Option<usize>,

    /// Language passed to the `lang`/`clang` query parameters
    #[serde(default = "defaults::lang")]
    pub lang: String,

    /// Fail the run instead of writing an empty dataset when the root fetch fails
    #[serde(default)]
    pub abort_on_root_failure: bool,
}

impl CrawlerConfig {
    /// Delay range used by the politeness limiter.
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            min_delay_ms: defaults::min_delay(),
            max_delay_ms: defaults::max_delay(),
            max_count: None,
            lang: defaults::lang(),
            abort_on_root_failure: false,
        }
    }
}

/// One vocabulary exposed by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// REST base path, e.g. `https://host/rest/v1/HornbostelAndSachs`
    pub base_url: String,

    /// Prefix that turns a page id into a concept URI
    pub concept_base: String,

    /// File name of the JSON document written for this vocabulary
    pub output_file: String,

    /// Page id the crawl starts from (top concepts are used when absent)
    #[serde(default)]
    pub root_page: Option<String>,
}

impl VocabularyConfig {
    /// Concept URI for a page id.
    pub fn concept_uri(&self, page: &str) -> String {
        format!("{}{}", self.concept_base, page)
    }

    fn validate(&self, section: &str) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            AppError::validation(format!("{section}.base_url is not a valid URL: {e}"))
        })?;
        if self.concept_base.trim().is_empty() {
            return Err(AppError::validation(format!(
                "{section}.concept_base is empty"
            )));
        }
        if self.output_file.trim().is_empty() {
            return Err(AppError::validation(format!(
                "{section}.output_file is empty"
            )));
        }
        Ok(())
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the JSON documents are written to
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    use super::VocabularyConfig;

    const REST_BASE: &str = "https://vocabulary.mimo-international.com/rest/v1";
    const CONCEPT_BASE: &str = "http://www.mimo-db.eu";

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; vocab-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn min_delay() -> u64 {
        714
    }
    pub fn max_delay() -> u64 {
        1273
    }
    pub fn lang() -> String {
        "en".into()
    }

    // Vocabulary defaults
    pub fn classification() -> VocabularyConfig {
        VocabularyConfig {
            base_url: format!("{REST_BASE}/HornbostelAndSachs"),
            concept_base: format!("{CONCEPT_BASE}/HornbostelAndSachs/"),
            output_file: "hornbostelSachs.json".into(),
            root_page: None,
        }
    }
    pub fn translation() -> VocabularyConfig {
        VocabularyConfig {
            base_url: format!("{REST_BASE}/InstrumentsKeywords"),
            concept_base: format!("{CONCEPT_BASE}/InstrumentsKeywords/"),
            output_file: "translationsMIMO.json".into(),
            root_page: Some("2208".into()),
        }
    }

    // Output defaults
    pub fn output_dir() -> String {
        "output".into()
    }
}
