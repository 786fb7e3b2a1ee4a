//! Signal generation pipeline.
//!
//! Session gate -> pair selection -> quote fetch -> scorer -> store.
//! The scorer never runs while all sessions are closed, a failed quote
//! fetch aborts the attempt before anything is written, and drafts
//! below the configured confidence floor are discarded.

use crate::error::{EngineError, Result};
use crate::services::market_data::MarketDataProvider;
use crate::services::pairs::PairRegistry;
use crate::services::scorer::SignalScorer;
use crate::services::sessions;
use crate::services::store::SignalStore;
use crate::types::Signal;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SignalGenerator {
    scorer: Arc<dyn SignalScorer>,
    market_data: Arc<MarketDataProvider>,
    pairs: Arc<PairRegistry>,
    store: Arc<SignalStore>,
    min_confidence: f64,
    generated: AtomicU64,
}

impl SignalGenerator {
    pub fn new(
        scorer: Arc<dyn SignalScorer>,
        market_data: Arc<MarketDataProvider>,
        pairs: Arc<PairRegistry>,
        store: Arc<SignalStore>,
        min_confidence: f64,
    ) -> Self {
        Self {
            scorer,
            market_data,
            pairs,
            store,
            min_confidence,
            generated: AtomicU64::new(0),
        }
    }

    /// Run one generation cycle. When no pair is given, one is selected
    /// from the pairs active in the current sessions.
    pub async fn generate(&self, pair: Option<&str>) -> Result<Signal> {
        self.generate_at(pair, Utc::now()).await
    }

    /// Generation cycle evaluated at an explicit instant. The session
    /// gate and pair selection use `now` rather than the wall clock.
    pub async fn generate_at(&self, pair: Option<&str>, now: DateTime<Utc>) -> Result<Signal> {
        if sessions::active_sessions(now).is_empty() {
            return Err(EngineError::Validation(
                "no market session is currently open".to_string(),
            ));
        }

        let pair = match pair {
            Some(p) => {
                if !self.pairs.contains(p) {
                    return Err(EngineError::Validation(format!("unsupported pair {p:?}")));
                }
                p
            }
            None => self.pairs.select_pair(now),
        };

        let quote = self.market_data.quote(pair).await?;
        let draft = self.scorer.score(pair, &quote, now)?;

        if draft.confidence < self.min_confidence {
            debug!(
                pair,
                confidence = draft.confidence,
                threshold = self.min_confidence,
                "draft below confidence threshold, discarding"
            );
            return Err(EngineError::Validation(format!(
                "signal confidence {:.1} is below the minimum {:.1}",
                draft.confidence, self.min_confidence
            )));
        }

        let signal = Signal::from_draft(pair, draft, quote.price, now);
        self.store.append(signal.clone())?;

        let count = self.generated.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            pair,
            direction = signal.direction.as_str(),
            confidence = signal.confidence,
            total_generated = count,
            "signal generated"
        );
        Ok(signal)
    }

    /// Number of signals generated since startup.
    pub fn generated_count(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    /// Liveness probe: the scorer must be able to score a synthetic
    /// quote without touching the network.
    pub fn scorer_healthy(&self) -> bool {
        let quote = crate::types::MarketQuote {
            pair: "EUR/USD".to_string(),
            price: 1.0850,
            bid: 1.0849,
            ask: 1.0851,
            high_24h: 1.0900,
            low_24h: 1.0800,
            volume: 1.0,
            change_24h: 0.001,
            volatility: 0.5,
            price_history: vec![1.0850; 20],
            timestamp: Utc::now(),
            source: crate::types::QuoteSource::Simulated,
        };
        self.scorer.score("EUR/USD", &quote, Utc::now()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, MarketQuote, RiskLevel, SignalDraft};
    use chrono::TimeZone;

    /// Scorer yielding a fixed confidence, for threshold tests.
    struct FixedScorer {
        confidence: f64,
    }

    impl SignalScorer for FixedScorer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn score(&self, _pair: &str, quote: &MarketQuote, _now: DateTime<Utc>) -> Result<SignalDraft> {
            Ok(SignalDraft {
                direction: Direction::Call,
                confidence: self.confidence,
                risk_level: RiskLevel::Medium,
                entry_price: quote.price,
                expiration_minutes: 15,
                analysis: "fixed confidence".to_string(),
            })
        }
    }

    fn generator_with(confidence: f64, min_confidence: f64) -> (SignalGenerator, Arc<SignalStore>) {
        let store = Arc::new(SignalStore::new());
        let generator = SignalGenerator::new(
            Arc::new(FixedScorer { confidence }),
            Arc::new(MarketDataProvider::new(None, 1, 30)),
            Arc::new(PairRegistry::new()),
            store.clone(),
            min_confidence,
        );
        (generator, store)
    }

    fn london_open() -> DateTime<Utc> {
        // 2024-01-03 is a Wednesday; 10:00 UTC is inside the London window.
        Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_low_confidence_draft_is_discarded() {
        let (generator, store) = generator_with(60.0, 70.0);

        let err = generator
            .generate_at(Some("EUR/USD"), london_open())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(err.to_string().contains("below the minimum"));

        assert!(store.is_empty());
        assert_eq!(generator.generated_count(), 0);
    }

    #[tokio::test]
    async fn test_confident_draft_is_stored() {
        let (generator, store) = generator_with(88.0, 70.0);

        let signal = generator
            .generate_at(Some("EUR/USD"), london_open())
            .await
            .unwrap();
        assert_eq!(signal.confidence, 88.0);
        assert_eq!(store.len(), 1);
        assert_eq!(generator.generated_count(), 1);
    }

    #[tokio::test]
    async fn test_generation_gated_while_market_closed() {
        let (generator, store) = generator_with(88.0, 70.0);
        let saturday = Utc.with_ymd_and_hms(2024, 1, 6, 10, 0, 0).unwrap();

        let err = generator
            .generate_at(Some("EUR/USD"), saturday)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(store.is_empty());
    }
}
