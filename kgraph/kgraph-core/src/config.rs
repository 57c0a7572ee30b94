//! Configuration for the kgraph engine.
//!
//! Configuration is read from a TOML file and then overridden by `KGRAPH_*`
//! environment variables. Every section has defaults, so an empty file (or
//! no file at all) yields a working configuration.
//!
//! # Example
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [traversal]
//! max_hops = 3
//! query_timeout_ms = 2000
//!
//! [search]
//! default_lexical_weight = 0.6
//! default_vector_weight = 0.4
//!
//! [cache]
//! ttl_seconds = 120
//! ```

use crate::error::{KgError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable prefix for all configuration overrides
pub const ENV_PREFIX: &str = "KGRAPH_";

// Environment variable names
pub const ENV_CONFIG_PATH: &str = "KGRAPH_CONFIG_PATH";
pub const ENV_LOG_LEVEL: &str = "KGRAPH_LOG_LEVEL";
pub const ENV_QUERY_TIMEOUT_MS: &str = "KGRAPH_QUERY_TIMEOUT_MS";
pub const ENV_VECTOR_THRESHOLD: &str = "KGRAPH_VECTOR_THRESHOLD";
pub const ENV_CACHE_ENABLED: &str = "KGRAPH_CACHE_ENABLED";
pub const ENV_CACHE_TTL_SECONDS: &str = "KGRAPH_CACHE_TTL_SECONDS";
pub const ENV_CACHE_MAX_CAPACITY: &str = "KGRAPH_CACHE_MAX_CAPACITY";

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KgConfig {
    pub general: GeneralConfig,
    pub traversal: TraversalConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// tracing filter directive used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Bounds applied at the API boundary, plus traversal defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub default_hops: usize,
    pub min_hops: usize,
    pub max_hops: usize,
    pub default_path_max_hops: usize,
    pub max_subgraph_nodes: usize,
    pub max_centrality_nodes: usize,
    /// Deadline for a single traversal in milliseconds (0 = unbounded)
    pub query_timeout_ms: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_hops: 1,
            min_hops: 1,
            max_hops: 3,
            default_path_max_hops: 5,
            max_subgraph_nodes: 100,
            max_centrality_nodes: 1000,
            query_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_lexical_weight: f64,
    pub default_vector_weight: f64,
    /// Minimum cosine similarity for vector candidates
    pub vector_threshold: f32,
    /// Vector candidates fused per query, whatever page is requested
    pub max_vector_candidates: usize,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub adaptive: AdaptiveConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_lexical_weight: 0.5,
            default_vector_weight: 0.5,
            vector_threshold: 0.7,
            max_vector_candidates: 200,
            default_page_size: 20,
            max_page_size: 100,
            adaptive: AdaptiveConfig::default(),
        }
    }
}

/// Thresholds of the adaptive weight selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Number of top candidates inspected per list
    pub probe_size: usize,
    /// A candidate is "strong" when it scores at least this share of the list's top score
    pub relative_threshold: f64,
    /// Quality difference needed before weights move off the default
    pub margin: f64,
    /// Weight given to the favored list
    pub favored_weight: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            probe_size: 5,
            relative_threshold: 0.5,
            margin: 0.15,
            favored_weight: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_seconds: u64,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300, // 5 minutes
            max_capacity: 1_000,
        }
    }
}

impl KgConfig {
    /// Parse configuration from TOML text, without env overrides.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: KgConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, apply env overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let mut config: KgConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, from `KGRAPH_CONFIG_PATH`, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        match path.map(Path::to_path_buf).or_else(|| env_path.map(Into::into)) {
            Some(path) => Self::load(&path),
            None => {
                debug!("No configuration file given, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Apply `KGRAPH_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.general.log_level = level;
        }
        override_parsed(ENV_QUERY_TIMEOUT_MS, &mut self.traversal.query_timeout_ms);
        override_parsed(ENV_VECTOR_THRESHOLD, &mut self.search.vector_threshold);
        override_parsed(ENV_CACHE_ENABLED, &mut self.cache.enabled);
        override_parsed(ENV_CACHE_TTL_SECONDS, &mut self.cache.ttl_seconds);
        override_parsed(ENV_CACHE_MAX_CAPACITY, &mut self.cache.max_capacity);
    }

    /// Reject configurations that would make the boundary checks meaningless.
    pub fn validate(&self) -> Result<()> {
        let t = &self.traversal;
        if t.min_hops == 0 || t.min_hops > t.max_hops {
            return Err(KgError::config(format!(
                "hop range {}..={} is empty or starts at zero",
                t.min_hops, t.max_hops
            )));
        }
        if !(t.min_hops..=t.max_hops).contains(&t.default_hops) {
            return Err(KgError::config("default_hops lies outside the hop range"));
        }
        if t.max_subgraph_nodes == 0 || t.max_centrality_nodes == 0 {
            return Err(KgError::config("node set limits must be positive"));
        }

        let s = &self.search;
        if s.default_lexical_weight < 0.0
            || s.default_vector_weight < 0.0
            || s.default_lexical_weight + s.default_vector_weight <= 0.0
        {
            return Err(KgError::config("default fusion weights must be non-negative and not both zero"));
        }
        if !(0.0..=1.0).contains(&s.vector_threshold) {
            return Err(KgError::config("vector_threshold must lie in [0, 1]"));
        }
        if s.default_page_size == 0 || s.max_page_size < s.default_page_size {
            return Err(KgError::config("page sizes must satisfy 0 < default_page_size <= max_page_size"));
        }
        if s.max_vector_candidates == 0 {
            return Err(KgError::config("max_vector_candidates must be positive"));
        }

        let a = &s.adaptive;
        if a.probe_size == 0 {
            return Err(KgError::config("adaptive.probe_size must be positive"));
        }
        if !(0.0..=1.0).contains(&a.relative_threshold) || !(0.5..=1.0).contains(&a.favored_weight) {
            return Err(KgError::config(
                "adaptive.relative_threshold must lie in [0, 1] and favored_weight in [0.5, 1]",
            ));
        }
        if a.margin < 0.0 {
            return Err(KgError::config("adaptive.margin must be non-negative"));
        }

        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(KgError::config("cache.max_capacity must be positive when the cache is enabled"));
        }

        Ok(())
    }
}

fn override_parsed<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(var) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring unparsable {}={}", var, raw),
        }
    }
}
