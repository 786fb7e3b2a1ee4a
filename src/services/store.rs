//! Append-only store of generated signals.
//!
//! The store is the single owner of canonical signal records. Signal
//! creation and outcome resolution are the only mutations and both run
//! under the write lock, so concurrent resolutions of the same id
//! cannot interleave. Readers take the read lock and observe a
//! consistent snapshot; no lock is held across an await point.

use crate::error::{EngineError, Result};
use crate::types::{Outcome, Signal};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub struct SignalStore {
    /// Creation order, oldest first.
    signals: RwLock<Vec<Signal>>,
    /// signal_id -> position in `signals`. Records are never removed,
    /// so positions are stable.
    index: DashMap<Uuid, usize>,
}

impl SignalStore {
    pub fn new() -> Self {
        Self {
            signals: RwLock::new(Vec::new()),
            index: DashMap::new(),
        }
    }

    /// Append a validated signal; it is visible to reads immediately.
    pub fn append(&self, signal: Signal) -> Result<Uuid> {
        validate(&signal)?;

        let id = signal.signal_id;
        let mut signals = self.signals.write().expect("signal store lock poisoned");
        if self.index.contains_key(&id) {
            return Err(EngineError::Validation(format!(
                "duplicate signal id {id}"
            )));
        }
        self.index.insert(id, signals.len());
        info!(signal_id = %id, pair = %signal.pair, direction = signal.direction.as_str(),
              "signal appended");
        signals.push(signal);
        Ok(id)
    }

    pub fn get(&self, signal_id: Uuid) -> Option<Signal> {
        let signals = self.signals.read().expect("signal store lock poisoned");
        self.index
            .get(&signal_id)
            .map(|pos| signals[*pos].clone())
    }

    /// The `limit` most recently created signals, newest first.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<Signal>> {
        if limit == 0 {
            return Err(EngineError::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }

        let signals = self.signals.read().expect("signal store lock poisoned");
        Ok(signals.iter().rev().take(limit).cloned().collect())
    }

    /// Signals for one pair within a trailing window of days, oldest
    /// first.
    pub fn get_by_pair(&self, pair: &str, days: i64) -> Vec<Signal> {
        let cutoff = Utc::now() - Duration::days(days.max(0));
        let signals = self.signals.read().expect("signal store lock poisoned");
        signals
            .iter()
            .filter(|s| s.pair == pair && s.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    /// Resolve a pending signal to win or loss. One-way: a signal that
    /// is already resolved is rejected with `InvalidTransition`, as is
    /// an attempt to set the outcome back to pending.
    pub fn resolve_outcome(&self, signal_id: Uuid, outcome: Outcome) -> Result<()> {
        if outcome == Outcome::Pending {
            return Err(EngineError::InvalidTransition(
                "outcome must be win or loss".to_string(),
            ));
        }

        let mut signals = self.signals.write().expect("signal store lock poisoned");
        let pos = *self
            .index
            .get(&signal_id)
            .ok_or_else(|| EngineError::NotFound(format!("signal {signal_id}")))?;

        let signal = &mut signals[pos];
        if signal.outcome != Outcome::Pending {
            return Err(EngineError::InvalidTransition(format!(
                "signal {signal_id} already resolved as {}",
                signal.outcome.as_str()
            )));
        }

        signal.outcome = outcome;
        signal.closed_at = Some(Utc::now());
        info!(signal_id = %signal_id, outcome = outcome.as_str(), "signal outcome resolved");
        Ok(())
    }

    /// Full snapshot for aggregation and export, oldest first.
    pub fn all(&self) -> Vec<Signal> {
        self.signals
            .read()
            .expect("signal store lock poisoned")
            .clone()
    }

    /// Pending signals whose expiry has passed.
    pub fn pending_resolvable(&self, now: DateTime<Utc>) -> Vec<Signal> {
        let signals = self.signals.read().expect("signal store lock poisoned");
        signals
            .iter()
            .filter(|s| s.is_resolvable(now))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.signals.read().expect("signal store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(signal: &Signal) -> Result<()> {
    let pair = signal.pair.trim();
    if pair.is_empty() || !pair.contains('/') {
        return Err(EngineError::Validation(format!(
            "malformed pair symbol {:?}",
            signal.pair
        )));
    }
    if !(0.0..=100.0).contains(&signal.confidence) {
        return Err(EngineError::Validation(format!(
            "confidence {} outside [0, 100]",
            signal.confidence
        )));
    }
    if signal.entry_price <= 0.0 || !signal.entry_price.is_finite() {
        return Err(EngineError::Validation(format!(
            "entry price {} must be positive",
            signal.entry_price
        )));
    }
    if signal.timestamp > signal.expiry {
        return Err(EngineError::Validation(
            "expiry precedes creation timestamp".to_string(),
        ));
    }
    Ok(())
}
