//! tradepulse - trading signal lifecycle and analytics engine.
//!
//! Generates directional trading signals gated by live market sessions,
//! tracks each one from creation to win/loss resolution and serves
//! aggregate performance statistics over a JSON API.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use error::EngineError;
use services::{
    HealthMonitor, MarketDataProvider, PairRegistry, PerformanceAggregator, RuleBasedScorer,
    SignalGenerator, SignalStore,
};
use std::sync::Arc;

/// Application state shared across handlers. The store is the only
/// owner of signal records; everything else derives views on demand.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SignalStore>,
    pub market_data: Arc<MarketDataProvider>,
    pub pairs: Arc<PairRegistry>,
    pub generator: Arc<SignalGenerator>,
    pub performance: Arc<PerformanceAggregator>,
    pub health: Arc<HealthMonitor>,
}

impl AppState {
    /// Wire up all components from configuration. Constructed once at
    /// process start and injected everywhere; no hidden singletons.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(SignalStore::new());
        let market_data = Arc::new(MarketDataProvider::new(
            config.alpha_vantage_api_key.clone(),
            config.market_data_timeout_secs,
            config.quote_cache_ttl_secs,
        ));
        let pairs = Arc::new(PairRegistry::new());
        let generator = Arc::new(SignalGenerator::new(
            Arc::new(RuleBasedScorer::new()),
            market_data.clone(),
            pairs.clone(),
            store.clone(),
            config.min_confidence,
        ));
        let performance = Arc::new(PerformanceAggregator::new(store.clone()));

        let mut health = HealthMonitor::new();
        {
            let generator = generator.clone();
            health.register("signal_scorer", move || {
                if generator.scorer_healthy() {
                    Ok(())
                } else {
                    Err(EngineError::ExternalUnavailable(
                        "scorer cannot score a reference quote".to_string(),
                    ))
                }
            });
        }
        {
            let market_data = market_data.clone();
            health.register("market_data", move || {
                if market_data.is_healthy() {
                    Ok(())
                } else {
                    Err(EngineError::ExternalUnavailable(
                        "market data provider cannot produce quotes".to_string(),
                    ))
                }
            });
        }
        {
            let pairs = pairs.clone();
            health.register("currency_pairs", move || {
                if pairs.is_fresh() {
                    Ok(())
                } else {
                    Err(EngineError::ExternalUnavailable(
                        "currency pair catalogue is empty or malformed".to_string(),
                    ))
                }
            });
        }
        {
            let store = store.clone();
            health.register("signal_store", move || store.get_recent(1).map(|_| ()));
        }

        Self {
            config,
            store,
            market_data,
            pairs,
            generator,
            performance,
            health: Arc::new(health),
        }
    }
}
