use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

use mentor_match::config::{LoggingSettings, Settings};
use mentor_match::models::{EnrichedRecommendation, RecommendationRequest};
use mentor_match::services::{
    CacheKey, DocumentCollections, DocumentStoreClient, PostgresSessionHistory, RecommendationCache,
};
use mentor_match::{Matcher, MatchingEngine};

/// Print mentor recommendations for a participant as JSON
#[derive(Debug, Parser)]
#[command(name = "mentor-match", version, about)]
struct Cli {
    /// Participant to recommend mentors for
    participant_id: String,

    /// Maximum number of recommendations
    #[arg(short, long)]
    limit: Option<usize>,

    /// Configuration file (defaults to config/default.toml + config/local.toml)
    #[arg(short, long, env = "MENTOR_MATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the recommendation cache
    #[arg(long)]
    no_cache: bool,

    /// Drop the participant's cached lists before recomputing, e.g. after a new completed session
    #[arg(long, conflicts_with = "no_cache")]
    refresh: bool,
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&settings.logging);

    let matching = settings.matching.to_matching_config()?;
    let request = RecommendationRequest::new(cli.participant_id, cli.limit);
    request.validate().context("Invalid recommendation request")?;
    let limit = request.effective_limit(matching.default_limit, matching.max_limit);

    let cache = if cli.no_cache {
        None
    } else {
        Some(build_cache(&settings).await)
    };
    let cache_key = CacheKey::recommendations(&request.participant_id, limit);

    if let Some(cache) = &cache {
        if cli.refresh {
            if let Err(e) = cache.invalidate_participant(&request.participant_id).await {
                warn!("Cache invalidation failed: {}", e);
            }
        } else {
            match cache.get::<Vec<EnrichedRecommendation>>(&cache_key).await {
                Ok(Some(cached)) => {
                    info!("Serving {} cached recommendations", cached.len());
                    println!("{}", serde_json::to_string_pretty(&cached)?);
                    return Ok(());
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed: {}", e),
            }
        }
    }

    let documents = Arc::new(
        DocumentStoreClient::new(
            settings.store.endpoint.clone(),
            settings.store.api_key.clone(),
            settings.store.project_id.clone(),
            settings.store.database_id.clone(),
            DocumentCollections {
                mentors: settings.collection.mentors.clone(),
                participants: settings.collection.participants.clone(),
            },
        )
        .context("Failed to build document store client")?,
    );

    let sessions = Arc::new(
        PostgresSessionHistory::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .context("Failed to connect to session history database")?,
    );

    info!("Matcher initialized with weights: {:?}", matching.weights);

    let engine = MatchingEngine::new(
        Matcher::new(matching),
        documents.clone(),
        sessions,
        documents,
    );

    let recommendations = engine
        .get_recommendations(&request.participant_id, limit)
        .await
        .with_context(|| format!("Recommendations unavailable for {}", request.participant_id))?;

    if let Some(cache) = &cache {
        if let Err(e) = cache.set(&cache_key, &recommendations).await {
            warn!("Failed to cache recommendations: {}", e);
        }
    }

    if recommendations.is_empty() {
        info!("No matches for participant {}", request.participant_id);
    }

    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}

async fn build_cache(settings: &Settings) -> RecommendationCache {
    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = RecommendationCache::new(l1_size, ttl);

    let Some(redis_url) = &settings.cache.redis_url else {
        return cache;
    };

    match RecommendationCache::new(l1_size, ttl).with_redis(redis_url).await {
        Ok(with_redis) => {
            info!("Recommendation cache initialized (L1: {} entries, TTL: {}s, Redis)", l1_size, ttl);
            with_redis
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), using in-process cache only", e);
            cache
        }
    }
}
