//! Performance aggregation.
//!
//! All statistics are recomputed from the store on every call; they are
//! a pure function of its contents at that instant. Win rates are
//! percentages over resolved signals only, and an empty denominator
//! yields 0.0 rather than an error.

use crate::services::store::SignalStore;
use crate::types::Outcome;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store-wide aggregate statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverallStats {
    pub total_signals: usize,
    /// Percentage of wins among resolved signals; 0.0 when nothing is
    /// resolved yet.
    pub win_rate: f64,
    /// Signals created during the current UTC calendar day.
    pub signals_today: usize,
    pub wins_today: usize,
    pub win_rate_today: f64,
    /// Mean confidence over all signals, resolved or not.
    pub avg_confidence: f64,
    pub completed_signals: usize,
    pub pending_signals: usize,
}

/// Per-pair aggregate. `total` counts every signal for the pair,
/// pending included; `win_rate` covers resolved signals only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PairPerformance {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

/// Resolved-only statistics over a trailing window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeframeStats {
    pub total_signals: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeframePerformance {
    pub last_24h: TimeframeStats,
    pub last_7d: TimeframeStats,
    pub last_30d: TimeframeStats,
}

pub struct PerformanceAggregator {
    store: Arc<SignalStore>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn win_rate_pct(wins: usize, resolved: usize) -> f64 {
    if resolved == 0 {
        0.0
    } else {
        round1(wins as f64 / resolved as f64 * 100.0)
    }
}

impl PerformanceAggregator {
    pub fn new(store: Arc<SignalStore>) -> Self {
        Self { store }
    }

    pub fn overall_stats(&self) -> OverallStats {
        self.overall_stats_at(Utc::now())
    }

    pub fn overall_stats_at(&self, now: DateTime<Utc>) -> OverallStats {
        let signals = self.store.all();
        let total_signals = signals.len();

        let completed = signals.iter().filter(|s| s.outcome.is_resolved()).count();
        let wins = signals.iter().filter(|s| s.outcome == Outcome::Win).count();

        let today = now.date_naive();
        let today_signals: Vec<_> = signals
            .iter()
            .filter(|s| s.timestamp.date_naive() == today)
            .collect();
        let today_completed = today_signals
            .iter()
            .filter(|s| s.outcome.is_resolved())
            .count();
        let wins_today = today_signals
            .iter()
            .filter(|s| s.outcome == Outcome::Win)
            .count();

        let avg_confidence = if total_signals == 0 {
            0.0
        } else {
            round1(signals.iter().map(|s| s.confidence).sum::<f64>() / total_signals as f64)
        };

        OverallStats {
            total_signals,
            win_rate: win_rate_pct(wins, completed),
            signals_today: today_signals.len(),
            wins_today,
            win_rate_today: win_rate_pct(wins_today, today_completed),
            avg_confidence,
            completed_signals: completed,
            pending_signals: total_signals - completed,
        }
    }

    /// Per-pair statistics. Pairs that have signals but nothing
    /// resolved are still reported, with win_rate 0.
    pub fn by_pair(&self) -> BTreeMap<String, PairPerformance> {
        let mut stats: BTreeMap<String, PairPerformance> = BTreeMap::new();

        for signal in self.store.all() {
            let entry = stats.entry(signal.pair.clone()).or_insert(PairPerformance {
                total: 0,
                wins: 0,
                losses: 0,
                win_rate: 0.0,
            });
            entry.total += 1;
            match signal.outcome {
                Outcome::Win => entry.wins += 1,
                Outcome::Loss => entry.losses += 1,
                Outcome::Pending => {}
            }
        }

        for perf in stats.values_mut() {
            perf.win_rate = win_rate_pct(perf.wins, perf.wins + perf.losses);
        }
        stats
    }

    pub fn by_timeframe(&self) -> TimeframePerformance {
        self.by_timeframe_at(Utc::now())
    }

    pub fn by_timeframe_at(&self, now: DateTime<Utc>) -> TimeframePerformance {
        let signals = self.store.all();
        let window = |cutoff: DateTime<Utc>| -> TimeframeStats {
            let resolved: Vec<_> = signals
                .iter()
                .filter(|s| s.timestamp >= cutoff && s.outcome.is_resolved())
                .collect();
            let wins = resolved
                .iter()
                .filter(|s| s.outcome == Outcome::Win)
                .count();
            TimeframeStats {
                total_signals: resolved.len(),
                wins,
                losses: resolved.len() - wins,
                win_rate: win_rate_pct(wins, resolved.len()),
            }
        };

        TimeframePerformance {
            last_24h: window(now - Duration::hours(24)),
            last_7d: window(now - Duration::days(7)),
            last_30d: window(now - Duration::days(30)),
        }
    }
}
