//! Outcome resolution.
//!
//! A pass walks every pending signal whose expiry has passed, fetches
//! the market price and settles the signal. CALL wins when the price at
//! expiry is above the entry, PUT wins when it is below; exact equality
//! settles as a loss (conservative tie-break). A feed failure defers
//! the signal to the next pass rather than failing the batch.

use crate::error::{EngineError, Result};
use crate::services::market_data::MarketDataProvider;
use crate::services::store::SignalStore;
use crate::types::{Direction, Outcome, Signal};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub wins: usize,
    pub losses: usize,
    /// Signals left pending because no price was available.
    pub deferred: usize,
}

pub struct OutcomeResolver {
    store: Arc<SignalStore>,
    market_data: Arc<MarketDataProvider>,
}

impl OutcomeResolver {
    pub fn new(store: Arc<SignalStore>, market_data: Arc<MarketDataProvider>) -> Self {
        Self { store, market_data }
    }

    /// Decide the outcome from the price observed at expiry. Equality
    /// resolves LOSS: a binary option that ends exactly at the entry
    /// does not pay out.
    pub fn decide(direction: Direction, entry_price: f64, price_at_expiry: f64) -> Outcome {
        let won = match direction {
            Direction::Call => price_at_expiry > entry_price,
            Direction::Put => price_at_expiry < entry_price,
        };
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    /// Resolve every eligible pending signal. Order among them is
    /// unspecified; each resolution is individually atomic.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> PassSummary {
        let eligible = self.store.pending_resolvable(now);
        let mut summary = PassSummary::default();

        for signal in eligible {
            let price = self.market_data.price_at(&signal.pair).await;
            self.apply(&signal, price, &mut summary);
        }

        if summary.evaluated > 0 || summary.deferred > 0 {
            info!(
                evaluated = summary.evaluated,
                wins = summary.wins,
                losses = summary.losses,
                deferred = summary.deferred,
                "resolution pass complete"
            );
        }
        summary
    }

    fn apply(&self, signal: &Signal, price: Result<f64>, summary: &mut PassSummary) {
        let price = match price {
            Ok(p) => p,
            Err(e) => {
                // Recoverable: retried on the next pass.
                warn!(signal_id = %signal.signal_id, pair = %signal.pair, error = %e,
                      "no price at expiry, deferring resolution");
                summary.deferred += 1;
                return;
            }
        };

        let outcome = Self::decide(signal.direction, signal.entry_price, price);
        match self.store.resolve_outcome(signal.signal_id, outcome) {
            Ok(()) => {
                summary.evaluated += 1;
                match outcome {
                    Outcome::Win => summary.wins += 1,
                    Outcome::Loss => summary.losses += 1,
                    Outcome::Pending => {}
                }
            }
            // Another writer settled this signal between the snapshot
            // and now; its outcome stands.
            Err(EngineError::InvalidTransition(_)) => {}
            Err(e) => {
                warn!(signal_id = %signal.signal_id, error = %e, "resolution failed");
            }
        }
    }
}
