//! Settings structures for the Rarefactor front end

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub suggest: SuggestSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with environment variables (RAREFACTOR_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RAREFACTOR_API_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = std::env::var("RAREFACTOR_SEARCH_PATH") {
            self.api.search_path = val;
        }
        if let Ok(val) = std::env::var("RAREFACTOR_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.suggest.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("RAREFACTOR_SEARCH_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.search.timeout = secs;
            }
        }
        if let Ok(val) = std::env::var("RAREFACTOR_CACHE") {
            self.cache.enabled = val.parse().unwrap_or(self.cache.enabled);
        }
    }

    /// Reject values the controllers cannot work with
    pub fn validate(&self) -> Result<()> {
        self.api.base_url()?;
        if self.suggest.debounce_ms == 0 {
            bail!("suggest.debounce_ms must be greater than zero");
        }
        if self.suggest.min_query_chars == 0 {
            bail!("suggest.min_query_chars must be at least 1");
        }
        seconds("search.timeout", self.search.timeout)?;
        seconds("outgoing.request_timeout", self.outgoing.request_timeout)?;
        Ok(())
    }
}

/// A positive, finite number of seconds that fits in a `Duration`
fn seconds(name: &str, value: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(d) if !d.is_zero() => Ok(d),
        _ => bail!("{name} must be a positive number of seconds, got {value}"),
    }
}

/// Location of the search API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Scheme, host, port and optional path prefix of the API
    pub base_url: String,
    /// Path of the ranked search endpoint (`/search` or `/v1/search`)
    pub search_path: String,
    /// Path of the autocomplete endpoint
    pub autocomplete_path: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            search_path: "/search".to_string(),
            autocomplete_path: "/autocomplete".to_string(),
        }
    }
}

impl ApiSettings {
    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid api.base_url {:?}", self.base_url))?;
        if url.cannot_be_a_base() {
            bail!("api.base_url {:?} cannot be used as a base", self.base_url);
        }
        Ok(url)
    }
}

/// Suggestion controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Quiet interval before a query is sent, in milliseconds
    pub debounce_ms: u64,
    /// Shorter queries clear the list without a request
    pub min_query_chars: usize,
    /// Maximum number of suggestions requested
    pub limit: u32,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            min_query_chars: crate::MIN_SUGGEST_CHARS,
            limit: 10,
        }
    }
}

impl SuggestSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Search controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Seconds a search may stay loading before it fails with a timeout
    pub timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout: crate::DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl SearchSettings {
    /// Falls back to the default when the value was never validated
    pub fn timeout(&self) -> Duration {
        seconds("search.timeout", self.timeout)
            .unwrap_or_else(|_| Duration::from_secs_f64(crate::DEFAULT_SEARCH_TIMEOUT))
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Transport-level request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent string (none = rarefactor/<version>)
    pub useragent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_SEARCH_TIMEOUT,
            pool_maxsize: 20,
            verify_ssl: true,
            useragent: None,
            proxies: ProxySettings::default(),
        }
    }
}

impl OutgoingSettings {
    pub fn request_timeout(&self) -> Duration {
        seconds("outgoing.request_timeout", self.request_timeout)
            .unwrap_or_else(|_| Duration::from_secs_f64(crate::DEFAULT_SEARCH_TIMEOUT))
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_seconds: u64,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300,
            max_capacity: 1000,
        }
    }
}
