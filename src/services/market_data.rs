//! Market data feed.
//!
//! Quotes come from Alpha Vantage when an API key is configured, then
//! the public exchange-rate API, and fall back to bounded simulated
//! data otherwise, so generation and resolution keep working offline.
//! A short-lived cache bounds outbound request volume under dashboard
//! polling.

use crate::error::{EngineError, Result};
use crate::types::{MarketQuote, QuoteSource};
use chrono::Utc;
use dashmap::DashMap;
use rand::Rng;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest";
const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Reference rates used to seed simulated quotes.
const BASE_RATES: &[(&str, f64)] = &[
    ("EUR/USD", 1.0850),
    ("GBP/USD", 1.2650),
    ("USD/JPY", 148.50),
    ("EUR/GBP", 0.8580),
    ("AUD/USD", 0.6720),
    ("USD/CHF", 0.8950),
    ("EUR/CHF", 0.9720),
    ("GBP/JPY", 187.80),
    ("AUD/JPY", 99.85),
    ("NZD/USD", 0.6180),
    ("USD/CAD", 1.3580),
    ("EUR/JPY", 161.20),
];

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    rates: std::collections::HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct AlphaVantageResponse {
    #[serde(rename = "Time Series (1min)")]
    time_series: Option<std::collections::HashMap<String, AlphaVantageBar>>,
}

#[derive(Debug, Deserialize)]
struct AlphaVantageBar {
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

/// Most recent intraday bar, keyed by the feed's timestamp strings
/// (lexicographic order matches chronological order for this format).
fn latest_bar(response: AlphaVantageResponse) -> Option<AlphaVantageBar> {
    response
        .time_series?
        .into_iter()
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, bar)| bar)
}

struct CachedQuote {
    quote: MarketQuote,
    fetched_at: Instant,
}

pub struct MarketDataProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    cache: DashMap<String, CachedQuote>,
    cache_ttl: Duration,
}

impl MarketDataProvider {
    pub fn new(api_key: Option<String>, timeout_secs: u64, cache_ttl_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // The upstream treats "demo" as no key at all.
            api_key: api_key.filter(|k| !k.is_empty() && k != "demo"),
            cache: DashMap::new(),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        }
    }

    /// Current quote for a pair. Never blocks past the client timeout;
    /// a feed miss degrades to simulated data rather than failing.
    pub async fn quote(&self, pair: &str) -> Result<MarketQuote> {
        if let Some(cached) = self.cache.get(pair) {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                return Ok(cached.quote.clone());
            }
        }

        let quote = match self.fetch_live(pair).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(pair, error = %e, "live quote fetch failed, using simulated data");
                self.simulate(pair)?
            }
        };

        self.cache.insert(
            pair.to_string(),
            CachedQuote {
                quote: quote.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(quote)
    }

    /// Price used by the resolver to settle a signal at expiry.
    pub async fn price_at(&self, pair: &str) -> Result<f64> {
        let quote = self.quote(pair).await?;
        if quote.price <= 0.0 || !quote.price.is_finite() {
            return Err(EngineError::ExternalUnavailable(format!(
                "no usable price for {pair}"
            )));
        }
        Ok(quote.price)
    }

    /// Alpha Vantage first when a key is configured, then the keyless
    /// exchange-rate feed.
    async fn fetch_live(&self, pair: &str) -> Result<MarketQuote> {
        if let Some(key) = self.api_key.as_deref() {
            match self.fetch_alpha_vantage(pair, key).await {
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    warn!(pair, error = %e, "alpha vantage fetch failed, trying exchange-rate feed");
                }
            }
        }
        self.fetch_exchange_rate(pair).await
    }

    async fn fetch_alpha_vantage(&self, pair: &str, key: &str) -> Result<MarketQuote> {
        let (base, counter) = pair.split_once('/').ok_or_else(|| {
            EngineError::Validation(format!("malformed pair symbol {pair:?}"))
        })?;

        let response = self
            .client
            .get(ALPHA_VANTAGE_URL)
            .query(&[
                ("function", "FX_INTRADAY"),
                ("from_symbol", base),
                ("to_symbol", counter),
                ("interval", "1min"),
                ("apikey", key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<AlphaVantageResponse>()
            .await?;

        let bar = latest_bar(response).ok_or_else(|| {
            EngineError::ExternalUnavailable(format!(
                "no intraday series for {pair} in feed response"
            ))
        })?;
        let close: f64 = bar.close.parse().map_err(|_| {
            EngineError::ExternalUnavailable(format!("unparseable close price for {pair}"))
        })?;

        debug!(pair, close, "alpha vantage quote fetched");

        let mut rng = rand::thread_rng();
        Ok(MarketQuote {
            pair: pair.to_string(),
            price: close,
            bid: close * 0.9998,
            ask: close * 1.0002,
            high_24h: bar.high.parse().unwrap_or(close),
            low_24h: bar.low.parse().unwrap_or(close),
            volume: rng.gen_range(0.5..1.5),
            change_24h: rng.gen_range(-0.02..0.02),
            volatility: rng.gen_range(0.2..0.9),
            price_history: price_history(close, 50),
            timestamp: Utc::now(),
            source: QuoteSource::AlphaVantage,
        })
    }

    async fn fetch_exchange_rate(&self, pair: &str) -> Result<MarketQuote> {
        let (base, counter) = pair.split_once('/').ok_or_else(|| {
            EngineError::Validation(format!("malformed pair symbol {pair:?}"))
        })?;

        let url = format!("{EXCHANGE_RATE_URL}/{base}");
        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ExchangeRateResponse>()
            .await?;

        let rate = response.rates.get(counter).copied().ok_or_else(|| {
            EngineError::ExternalUnavailable(format!("no rate for {pair} in feed response"))
        })?;

        debug!(pair, rate, "live quote fetched");

        let mut rng = rand::thread_rng();
        let spread = rate * 0.0002;
        Ok(MarketQuote {
            pair: pair.to_string(),
            price: rate,
            bid: rate - spread / 2.0,
            ask: rate + spread / 2.0,
            high_24h: rate * rng.gen_range(1.002..1.008),
            low_24h: rate * rng.gen_range(0.992..0.998),
            volume: rng.gen_range(0.3..1.2),
            change_24h: rng.gen_range(-0.02..0.02),
            volatility: rng.gen_range(0.2..0.9),
            price_history: price_history(rate, 50),
            timestamp: Utc::now(),
            source: QuoteSource::ExchangeRateApi,
        })
    }

    /// Deterministic enough for testing, realistic enough for the
    /// dashboard: seeded from known reference rates with a bounded
    /// daily move.
    fn simulate(&self, pair: &str) -> Result<MarketQuote> {
        if !pair.contains('/') {
            return Err(EngineError::Validation(format!(
                "malformed pair symbol {pair:?}"
            )));
        }

        let mut rng = rand::thread_rng();
        let base_price = BASE_RATES
            .iter()
            .find(|(p, _)| *p == pair)
            .map(|(_, rate)| *rate)
            .unwrap_or_else(|| {
                if pair.contains("JPY") {
                    rng.gen_range(100.0..200.0)
                } else {
                    rng.gen_range(0.5..2.0)
                }
            });

        let daily_change = rng.gen_range(-0.015..0.015);
        let price = base_price * (1.0 + daily_change);
        let spread = base_price * rng.gen_range(0.0001..0.0005);

        Ok(MarketQuote {
            pair: pair.to_string(),
            price,
            bid: price - spread / 2.0,
            ask: price + spread / 2.0,
            high_24h: price * rng.gen_range(1.003..1.012),
            low_24h: price * rng.gen_range(0.988..0.997),
            volume: rng.gen_range(0.4..1.8),
            change_24h: daily_change,
            volatility: rng.gen_range(0.2..0.9),
            price_history: price_history(price, 50),
            timestamp: Utc::now(),
            source: QuoteSource::Simulated,
        })
    }

    /// Liveness probe for the health monitor: the provider is healthy
    /// if it can produce a usable quote without touching the network.
    pub fn is_healthy(&self) -> bool {
        match self.simulate("EUR/USD") {
            Ok(quote) => quote.price > 0.0,
            Err(_) => false,
        }
    }
}

/// Random walk with gentle mean reversion, oldest first.
fn price_history(current: f64, periods: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    let mut history = Vec::with_capacity(periods);
    let mut price = current;

    for _ in 0..periods {
        let step = rng.gen_range(-0.001..0.001) * current;
        let reversion = (current - price) * 0.01;
        price += step + reversion;
        history.push(price);
    }

    history.reverse();
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_quote_is_well_formed() {
        let provider = MarketDataProvider::new(None, 5, 30);
        let quote = provider.simulate("EUR/USD").unwrap();

        assert_eq!(quote.pair, "EUR/USD");
        assert!(quote.price > 0.0);
        assert!(quote.bid < quote.ask);
        assert!((0.0..=1.0).contains(&quote.volatility));
        assert_eq!(quote.price_history.len(), 50);
        assert_eq!(quote.source, QuoteSource::Simulated);
    }

    #[test]
    fn test_simulated_quote_unknown_pair() {
        let provider = MarketDataProvider::new(None, 5, 30);
        let quote = provider.simulate("SEK/NOK").unwrap();
        assert!(quote.price > 0.0);
    }

    #[test]
    fn test_simulate_rejects_malformed_pair() {
        let provider = MarketDataProvider::new(None, 5, 30);
        assert!(provider.simulate("EURUSD").is_err());
    }

    #[test]
    fn test_jpy_pairs_use_jpy_scale() {
        let provider = MarketDataProvider::new(None, 5, 30);
        let quote = provider.simulate("CAD/JPY").unwrap();
        assert!(quote.price > 50.0);
    }

    #[test]
    fn test_provider_is_healthy() {
        assert!(MarketDataProvider::new(None, 5, 30).is_healthy());
    }

    #[test]
    fn test_placeholder_api_keys_are_dropped() {
        assert!(MarketDataProvider::new(Some("demo".to_string()), 5, 30)
            .api_key
            .is_none());
        assert!(MarketDataProvider::new(Some(String::new()), 5, 30)
            .api_key
            .is_none());
        assert_eq!(
            MarketDataProvider::new(Some("K3Y".to_string()), 5, 30).api_key,
            Some("K3Y".to_string())
        );
    }

    #[test]
    fn test_alpha_vantage_latest_bar() {
        let body = r#"{
            "Time Series (1min)": {
                "2024-01-03 10:00:00": {
                    "1. open": "1.0840", "2. high": "1.0860",
                    "3. low": "1.0830", "4. close": "1.0845"
                },
                "2024-01-03 10:01:00": {
                    "1. open": "1.0845", "2. high": "1.0870",
                    "3. low": "1.0840", "4. close": "1.0855"
                }
            }
        }"#;
        let response: AlphaVantageResponse = serde_json::from_str(body).unwrap();
        let bar = latest_bar(response).unwrap();
        assert_eq!(bar.close, "1.0855");
        assert_eq!(bar.high, "1.0870");
    }

    #[test]
    fn test_alpha_vantage_error_body_has_no_bar() {
        // Rate-limit and error responses carry a note instead of a series.
        let body = r#"{"Note": "API call frequency exceeded"}"#;
        let response: AlphaVantageResponse = serde_json::from_str(body).unwrap();
        assert!(latest_bar(response).is_none());
    }

    #[tokio::test]
    async fn test_quote_cache_hit() {
        let provider = MarketDataProvider::new(None, 1, 300);
        // Seed the cache directly so the test never touches the network.
        let seeded = provider.simulate("EUR/USD").unwrap();
        provider.cache.insert(
            "EUR/USD".to_string(),
            CachedQuote {
                quote: seeded.clone(),
                fetched_at: Instant::now(),
            },
        );

        let quote = provider.quote("EUR/USD").await.unwrap();
        assert_eq!(quote.price, seeded.price);
        assert_eq!(quote.timestamp, seeded.timestamp);
    }
}
