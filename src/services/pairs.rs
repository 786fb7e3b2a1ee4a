//! Currency pair registry.
//!
//! Static catalogue of supported pairs with trading characteristics,
//! used for pair selection and session-aware activity checks.

use crate::types::Session;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::sessions;

/// Pair grouping used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairCategory {
    Major,
    Cross,
    Exotic,
}

/// Static characteristics of a supported currency pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairInfo {
    pub pair: &'static str,
    pub name: &'static str,
    pub category: PairCategory,
    pub base_volume: f64,
    pub avg_spread: f64,
    pub volatility: f64,
    pub sessions: &'static [Session],
    pub popularity: f64,
}

/// Catalogue entry enriched with live activity state.
#[derive(Debug, Clone, Serialize)]
pub struct PairStatus {
    #[serde(flatten)]
    pub info: PairInfo,
    pub active: bool,
}

const CATALOGUE: &[PairInfo] = &[
    PairInfo {
        pair: "EUR/USD",
        name: "Euro / US Dollar",
        category: PairCategory::Major,
        base_volume: 1.8,
        avg_spread: 0.0001,
        volatility: 0.65,
        sessions: &[Session::European, Session::Us],
        popularity: 0.95,
    },
    PairInfo {
        pair: "GBP/USD",
        name: "British Pound / US Dollar",
        category: PairCategory::Major,
        base_volume: 1.5,
        avg_spread: 0.0002,
        volatility: 0.75,
        sessions: &[Session::European, Session::Us],
        popularity: 0.90,
    },
    PairInfo {
        pair: "USD/JPY",
        name: "US Dollar / Japanese Yen",
        category: PairCategory::Major,
        base_volume: 1.6,
        avg_spread: 0.0001,
        volatility: 0.60,
        sessions: &[Session::Asian, Session::Us],
        popularity: 0.88,
    },
    PairInfo {
        pair: "AUD/USD",
        name: "Australian Dollar / US Dollar",
        category: PairCategory::Major,
        base_volume: 1.2,
        avg_spread: 0.0002,
        volatility: 0.70,
        sessions: &[Session::Asian, Session::Us],
        popularity: 0.75,
    },
    PairInfo {
        pair: "EUR/CHF",
        name: "Euro / Swiss Franc",
        category: PairCategory::Cross,
        base_volume: 1.4,
        avg_spread: 0.0003,
        volatility: 0.85,
        sessions: &[Session::European],
        popularity: 0.80,
    },
    PairInfo {
        pair: "AUD/JPY",
        name: "Australian Dollar / Japanese Yen",
        category: PairCategory::Cross,
        base_volume: 1.3,
        avg_spread: 0.0003,
        volatility: 0.90,
        sessions: &[Session::Asian],
        popularity: 0.85,
    },
    PairInfo {
        pair: "GBP/JPY",
        name: "British Pound / Japanese Yen",
        category: PairCategory::Cross,
        base_volume: 1.1,
        avg_spread: 0.0004,
        volatility: 0.95,
        sessions: &[Session::European, Session::Asian],
        popularity: 0.78,
    },
    PairInfo {
        pair: "EUR/GBP",
        name: "Euro / British Pound",
        category: PairCategory::Cross,
        base_volume: 1.0,
        avg_spread: 0.0002,
        volatility: 0.55,
        sessions: &[Session::European],
        popularity: 0.72,
    },
    PairInfo {
        pair: "NZD/USD",
        name: "New Zealand Dollar / US Dollar",
        category: PairCategory::Exotic,
        base_volume: 0.8,
        avg_spread: 0.0005,
        volatility: 0.80,
        sessions: &[Session::Asian, Session::Us],
        popularity: 0.60,
    },
    PairInfo {
        pair: "USD/CHF",
        name: "US Dollar / Swiss Franc",
        category: PairCategory::Exotic,
        base_volume: 0.9,
        avg_spread: 0.0004,
        volatility: 0.65,
        sessions: &[Session::European, Session::Us],
        popularity: 0.65,
    },
    PairInfo {
        pair: "USD/CAD",
        name: "US Dollar / Canadian Dollar",
        category: PairCategory::Exotic,
        base_volume: 1.0,
        avg_spread: 0.0003,
        volatility: 0.70,
        sessions: &[Session::Us],
        popularity: 0.68,
    },
    PairInfo {
        pair: "EUR/JPY",
        name: "Euro / Japanese Yen",
        category: PairCategory::Exotic,
        base_volume: 1.1,
        avg_spread: 0.0003,
        volatility: 0.75,
        sessions: &[Session::European, Session::Asian],
        popularity: 0.70,
    },
];

pub struct PairRegistry;

impl PairRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn info(&self, pair: &str) -> Option<PairInfo> {
        CATALOGUE.iter().find(|p| p.pair == pair).cloned()
    }

    pub fn contains(&self, pair: &str) -> bool {
        self.info(pair).is_some()
    }

    /// Pairs whose trading sessions overlap the sessions open at `now`.
    /// Falls back to the majors when nothing is open.
    pub fn active_pairs(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        let open = sessions::active_sessions(now);
        let active: Vec<&'static str> = CATALOGUE
            .iter()
            .filter(|p| p.sessions.iter().any(|s| open.contains(s)))
            .map(|p| p.pair)
            .collect();

        if active.is_empty() {
            CATALOGUE
                .iter()
                .filter(|p| p.category == PairCategory::Major)
                .map(|p| p.pair)
                .collect()
        } else {
            active
        }
    }

    /// Full catalogue with live activity flags.
    pub fn all_pairs_status(&self, now: DateTime<Utc>) -> Vec<PairStatus> {
        let active = self.active_pairs(now);
        CATALOGUE
            .iter()
            .map(|info| PairStatus {
                active: active.contains(&info.pair),
                info: info.clone(),
            })
            .collect()
    }

    /// Pick a pair for generation when none was requested, weighted by
    /// volume and popularity among the currently active pairs.
    pub fn select_pair(&self, now: DateTime<Utc>) -> &'static str {
        let active = self.active_pairs(now);
        let mut rng = rand::thread_rng();

        let weighted: Vec<(&'static str, f64)> = CATALOGUE
            .iter()
            .filter(|p| active.contains(&p.pair))
            .map(|p| (p.pair, p.base_volume * p.popularity))
            .collect();

        if weighted.is_empty() {
            return "EUR/USD";
        }

        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen_range(0.0..total);
        for (pair, weight) in &weighted {
            roll -= weight;
            if roll <= 0.0 {
                return pair;
            }
        }
        // Floating-point edge: fall back to a uniform choice.
        weighted
            .choose(&mut rng)
            .map(|(pair, _)| *pair)
            .unwrap_or("EUR/USD")
    }

    /// Freshness probe for the health monitor. The catalogue is static,
    /// so this only verifies it is non-empty and well-formed.
    pub fn is_fresh(&self) -> bool {
        !CATALOGUE.is_empty() && CATALOGUE.iter().all(|p| p.pair.contains('/'))
    }
}

impl Default for PairRegistry {
    fn default() -> Self {
        Self::new()
    }
}
