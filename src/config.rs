use config::{Config, ConfigError, Environment, File};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::extraction::body_text::DEFAULT_CURRENCY_SYMBOLS;
use crate::extraction::markup::{DEFAULT_META_SELECTORS, DEFAULT_PRICE_SELECTORS};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub extractor: ExtractorConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,
    pub retry_attempts: usize,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub meta_selectors: Vec<String>,
    pub price_selectors: Vec<String>,
    pub currency_symbols: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub max_concurrent_checks: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 15,
            retry_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            meta_selectors: DEFAULT_META_SELECTORS.iter().map(|s| s.to_string()).collect(),
            price_selectors: DEFAULT_PRICE_SELECTORS.iter().map(|s| s.to_string()).collect(),
            currency_symbols: DEFAULT_CURRENCY_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_checks: 4,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load(Path::new("config"), &run_mode)
    }

    /// Layer `default`, `{run_mode}` and `local` files from `config_dir` over the
    /// built-in defaults, then `WISHLIST__*` environment variables on top.
    pub fn load(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let file = |name: &str| {
            File::with_name(&config_dir.join(name).to_string_lossy()).required(false)
        };

        let s = Config::builder()
            .add_source(file("default"))
            .add_source(file(run_mode))
            // Local overrides, ignored by git
            .add_source(file("local"))
            .add_source(Environment::with_prefix("WISHLIST").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Fetcher
        if self.fetcher.timeout_secs == 0 {
            return Err(ConfigError::Message("Fetcher timeout_secs must be greater than 0".into()));
        }

        if self.fetcher.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Fetcher user_agent must not be empty".into()));
        }

        // Extractor
        if self.extractor.meta_selectors.is_empty() && self.extractor.price_selectors.is_empty() {
            return Err(ConfigError::Message("Extractor needs at least one meta or price selector".into()));
        }

        for selector in self.extractor.meta_selectors.iter().chain(&self.extractor.price_selectors) {
            if Selector::parse(selector).is_err() {
                return Err(ConfigError::Message(format!("Invalid CSS selector in extractor config: {}", selector)));
            }
        }

        if self.extractor.currency_symbols.is_empty() {
            return Err(ConfigError::Message("Extractor currency_symbols must not be empty".into()));
        }

        if self.extractor.currency_symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Message("Extractor currency_symbols must not contain blank entries".into()));
        }

        // Tracker
        if self.tracker.max_concurrent_checks == 0 {
            return Err(ConfigError::Message("Tracker max_concurrent_checks must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
