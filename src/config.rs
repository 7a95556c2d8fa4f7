use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_FEED_URL: &str =
    "https://api.data.gov.in/resource/35985678-0d79-46b4-9ed6-6f13308a1d24";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    pub feed: FeedConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub general: General,
    /// Extra free-text term → commodity names, tried before the built-in dictionary.
    pub synonyms: toml::Table,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// data.gov.in access key. Overridden by `DATA_GOV_API_KEY`.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    /// Records requested per call
    pub page_size: u32,
    /// Per-candidate request budget
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_URL.to_string(),
            page_size: 1000,
            timeout_secs: 10,
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// Queries shorter than this (after trimming) clear the result instead of searching.
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_query_chars: 2,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `path` if it exists, then apply `.env` and environment overrides.
    pub fn load_with_env(path: &str) -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        let mut config = if Path::new(path).exists() {
            Self::load(path)?
        } else {
            Config::default()
        };

        if let Ok(key) = std::env::var("DATA_GOV_API_KEY") {
            config.credentials.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("MANDI_FEED_URL") {
            config.feed.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Access key with blanks treated as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.credentials
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// `[synonyms]` entries as (term, commodities), in file order.
    pub fn synonym_entries(&self) -> anyhow::Result<Vec<(String, Vec<String>)>> {
        let mut entries = Vec::with_capacity(self.synonyms.len());
        for (term, value) in &self.synonyms {
            let names = match value {
                toml::Value::String(name) => vec![name.clone()],
                toml::Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            anyhow::anyhow!("synonyms.{term} must only contain strings")
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?,
                _ => anyhow::bail!("synonyms.{term} must be a string or list of strings"),
            };
            entries.push((term.clone(), names));
        }
        Ok(entries)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut issues: Vec<String> = Vec::new();

        if self.feed.base_url.trim().is_empty() {
            issues.push("feed.base_url must not be empty".into());
        }
        if self.feed.page_size == 0 {
            issues.push("feed.page_size must be > 0".into());
        }
        if self.feed.timeout_secs == 0 {
            issues.push("feed.timeout_secs must be > 0".into());
        }
        if self.search.min_query_chars == 0 {
            issues.push("search.min_query_chars must be > 0".into());
        }
        if self.cache.ttl_secs == 0 {
            issues.push("cache.ttl_secs must be > 0".into());
        }
        if let Err(e) = self.synonym_entries() {
            issues.push(e.to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid config:\n - {}", issues.join("\n - "))
        }
    }
}
