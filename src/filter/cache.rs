//! Cached pattern parsing

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::addrs::{parse_target, AddressError, Target};

/// Configuration for the target parser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Cache parsed patterns by their literal text
    pub enable_cache: bool,

    /// Maximum number of entries before the cache is cleared
    pub max_cache_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            max_cache_size: 10_000,
        }
    }
}

/// Cache statistics for monitoring performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Parses filter patterns into [`Target`]s, remembering earlier results
///
/// # Thread Safety
///
/// TargetParser uses DashMap for its cache and can be shared across threads
/// and across filters over different states. Parsing is pure, so a cached
/// entry never goes stale.
///
/// # Examples
///
/// ```
/// use statefilter::{ParserConfig, TargetParser};
///
/// let parser = TargetParser::new(ParserConfig::default());
/// parser.parse("module.app").unwrap();
/// parser.parse("module.app").unwrap();
///
/// let stats = parser.get_stats();
/// assert_eq!(stats.miss_count, 1);
/// assert_eq!(stats.hit_count, 1);
/// ```
#[derive(Debug)]
pub struct TargetParser {
    config: ParserConfig,
    cache: DashMap<String, Target>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl TargetParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    /// Parses a pattern, consulting the cache first
    ///
    /// Failed parses are not cached.
    pub fn parse(&self, pattern: &str) -> Result<Target, AddressError> {
        if !self.config.enable_cache {
            return parse_target(pattern);
        }

        if let Some(entry) = self.cache.get(pattern) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.clone());
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);

        let target = parse_target(pattern)?;

        if self.config.max_cache_size == 0 {
            return Ok(target);
        }
        if self.cache.len() >= self.config.max_cache_size {
            debug!(size = self.cache.len(), "target cache full, clearing");
            self.cache.clear();
        }
        self.cache.insert(pattern.to_string(), target.clone());

        Ok(target)
    }

    /// Clears the cache and resets statistics
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> CacheStats {
        let size = self.cache.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            size,
            hit_count: hits,
            miss_count: misses,
            hit_rate,
        }
    }
}

impl Default for TargetParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_and_miss() {
        let parser = TargetParser::default();

        let first = parser.parse("aws_instance.web").unwrap();
        let second = parser.parse("aws_instance.web").unwrap();
        assert_eq!(first, second);

        let stats = parser.get_stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert!((stats.hit_rate - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let parser = TargetParser::default();

        assert!(parser.parse("not valid!!").is_err());
        assert!(parser.parse("not valid!!").is_err());

        let stats = parser.get_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.miss_count, 2);
    }

    #[test]
    fn test_cache_disabled() {
        let parser = TargetParser::new(ParserConfig {
            enable_cache: false,
            ..ParserConfig::default()
        });

        parser.parse("module.a").unwrap();
        parser.parse("module.a").unwrap();

        let stats = parser.get_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
    }

    #[test]
    fn test_cache_cleared_when_full() {
        let parser = TargetParser::new(ParserConfig {
            max_cache_size: 2,
            ..ParserConfig::default()
        });

        parser.parse("module.a").unwrap();
        parser.parse("module.b").unwrap();
        assert_eq!(parser.get_stats().size, 2);

        parser.parse("module.c").unwrap();
        assert_eq!(parser.get_stats().size, 1);
    }

    #[test]
    fn test_zero_size_cache_stores_nothing() {
        let parser = TargetParser::new(ParserConfig {
            enable_cache: true,
            max_cache_size: 0,
        });

        assert!(parser.parse("module.a").is_ok());
        assert!(parser.parse("module.a").is_ok());

        let stats = parser.get_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 2);
    }

    #[test]
    fn test_clear_cache() {
        let parser = TargetParser::default();
        parser.parse("module.a").unwrap();

        parser.clear_cache();
        let stats = parser.get_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"max_cache_size": 5}"#).unwrap();
        assert!(config.enable_cache);
        assert_eq!(config.max_cache_size, 5);
    }
}
