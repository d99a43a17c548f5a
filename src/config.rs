use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{MatchingConfig, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub mentors: String,
    pub participants: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_recommendation_min_rating")]
    pub recommendation_min_rating: f64,
    #[serde(default = "default_rating_boost_threshold")]
    pub rating_boost_threshold: f64,
    #[serde(default = "default_rating_boost")]
    pub rating_boost: f64,
    #[serde(default = "default_diversity_penalty")]
    pub diversity_penalty: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            recommendation_min_rating: default_recommendation_min_rating(),
            rating_boost_threshold: default_rating_boost_threshold(),
            rating_boost: default_rating_boost(),
            diversity_penalty: default_diversity_penalty(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_recommendation_min_rating() -> f64 { 3.5 }
fn default_rating_boost_threshold() -> f64 { 4.5 }
fn default_rating_boost() -> f64 { 1.1 }
fn default_diversity_penalty() -> f64 { 0.9 }
fn default_limit() -> usize { 5 }
fn default_max_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_expertise_weight")]
    pub expertise: f64,
    #[serde(default = "default_project_needs_weight")]
    pub project_needs: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_industry_weight")]
    pub industry: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            expertise: default_expertise_weight(),
            project_needs: default_project_needs_weight(),
            rating: default_rating_weight(),
            industry: default_industry_weight(),
            availability: default_availability_weight(),
        }
    }
}

fn default_expertise_weight() -> f64 { 0.35 }
fn default_project_needs_weight() -> f64 { 0.25 }
fn default_rating_weight() -> f64 { 0.20 }
fn default_industry_weight() -> f64 { 0.15 }
fn default_availability_weight() -> f64 { 0.05 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self {
            expertise: w.expertise,
            project_needs: w.project_needs,
            rating: w.rating,
            industry: w.industry,
            availability: w.availability,
        }
    }
}

impl MatchingSettings {
    /// Engine configuration; fails when the weights do not sum to 1.0
    pub fn to_matching_config(&self) -> Result<MatchingConfig, ConfigError> {
        let weights = ScoringWeights::from(&self.weights);
        if !weights.is_normalized() {
            return Err(ConfigError::Message(format!(
                "matching.weights must sum to 1.0, got {:.4}",
                weights.sum()
            )));
        }

        Ok(MatchingConfig {
            weights,
            recommendation_min_rating: self.recommendation_min_rating,
            rating_boost_threshold: self.rating_boost_threshold,
            rating_boost: self.rating_boost,
            diversity_penalty: self.diversity_penalty,
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTOR_MATCH__DATABASE__URL -> database.url
            .add_source(env_source())
            .build()?;

        let settings: Self = substitute_env_vars(settings)?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings: Self = substitute_env_vars(settings)?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.matching.to_matching_config().map(|_| ())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MENTOR_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known environment variables that don't follow the prefix scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("MENTOR_MATCH_STORE_API_KEY") {
        builder = builder.set_override("store.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.expertise, 0.35);
        assert_eq!(weights.project_needs, 0.25);
        assert_eq!(weights.rating, 0.20);
        assert_eq!(weights.industry, 0.15);
        assert_eq!(weights.availability, 0.05);
    }

    #[test]
    fn test_default_matching_config() {
        let config = MatchingSettings::default().to_matching_config().unwrap();
        assert_eq!(config, MatchingConfig::default());
    }

    #[test]
    fn test_unnormalized_weights_rejected() {
        let mut settings = MatchingSettings::default();
        settings.weights.expertise = 0.5;
        assert!(settings.to_matching_config().is_err());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("mentor_match_test_{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[store]
endpoint = "https://store.test/v1"
api_key = "key"
project_id = "project"
database_id = "db"

[collection]
mentors = "mentors"
participants = "participants"

[database]
url = "postgres://localhost/mentor_match"

[matching]
diversity_penalty = 0.8
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.collection.mentors, "mentors");
        assert_eq!(settings.matching.diversity_penalty, 0.8);
        assert_eq!(settings.matching.rating_boost, 1.1);
        assert!(settings.cache.redis_url.is_none());
    }
}
