//! Signal scoring strategies.
//!
//! The engine treats scoring as an opaque, pluggable strategy: anything
//! that can turn a pair and a market quote into a draft signal. The
//! shipped `RuleBasedScorer` derives direction from short-term momentum
//! and grades risk from confidence, volatility and trend strength.

use crate::error::{EngineError, Result};
use crate::types::{Direction, MarketQuote, RiskLevel, SignalDraft};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Scoring strategy seam. Implementations must be cheap and must not
/// perform I/O; the generator hands them a fully fetched quote.
pub trait SignalScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, pair: &str, quote: &MarketQuote, now: DateTime<Utc>) -> Result<SignalDraft>;
}

/// Trend label derived from the quote history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Bullish,
    Bearish,
    Sideways,
}

pub struct RuleBasedScorer;

impl RuleBasedScorer {
    pub fn new() -> Self {
        Self
    }

    fn trend(history: &[f64], price: f64) -> (Trend, f64) {
        if history.len() < 2 {
            return (Trend::Sideways, 0.5);
        }

        let sma: f64 = history.iter().sum::<f64>() / history.len() as f64;
        let deviation = (price - sma) / sma;

        // Strength saturates around a 0.5% move off the mean.
        let strength = (deviation.abs() / 0.005).min(1.0);
        let trend = if deviation > 0.0005 {
            Trend::Bullish
        } else if deviation < -0.0005 {
            Trend::Bearish
        } else {
            Trend::Sideways
        };
        (trend, strength)
    }

    fn risk_level(confidence: f64, volatility: f64, trend_strength: f64) -> RiskLevel {
        let mut risk_score = 0u8;

        if confidence < 70.0 {
            risk_score += 2;
        } else if confidence < 85.0 {
            risk_score += 1;
        }
        if volatility > 0.8 {
            risk_score += 2;
        } else if volatility > 0.6 {
            risk_score += 1;
        }
        if trend_strength < 0.4 {
            risk_score += 1;
        }

        match risk_score {
            0..=1 => RiskLevel::Low,
            2..=3 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    fn expiration_minutes(confidence: f64, volatility: f64) -> i64 {
        let mut rng = rand::thread_rng();
        let mut minutes: i64 = if confidence > 85.0 {
            rng.gen_range(5..=10)
        } else if confidence > 70.0 {
            rng.gen_range(10..=20)
        } else {
            rng.gen_range(15..=30)
        };

        if volatility > 0.7 {
            minutes = (minutes - 5).max(5);
        } else if volatility < 0.3 {
            minutes += 10;
        }

        minutes.clamp(5, 60)
    }

    fn analysis_text(trend: Trend, volatility: f64, direction: Direction, confidence: f64) -> String {
        let trend_part = match trend {
            Trend::Bullish => "Strong bullish momentum detected",
            Trend::Bearish => "Clear bearish pressure identified",
            Trend::Sideways => "Market showing consolidation pattern",
        };
        let volatility_part = if volatility > 0.7 {
            "high volatility suggests strong price movement"
        } else if volatility < 0.3 {
            "low volatility indicates stable price action"
        } else {
            "moderate volatility with clear directional bias"
        };
        let reasoning = match direction {
            Direction::Call => "technical indicators align for upward movement",
            Direction::Put => "technical indicators suggest downward pressure",
        };

        format!(
            "{trend_part}, {volatility_part}, {reasoning}. Confidence: {confidence:.1}%"
        )
    }
}

impl SignalScorer for RuleBasedScorer {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn score(&self, pair: &str, quote: &MarketQuote, _now: DateTime<Utc>) -> Result<SignalDraft> {
        if quote.price <= 0.0 || !quote.price.is_finite() {
            return Err(EngineError::ExternalUnavailable(format!(
                "unusable quote for {pair}"
            )));
        }

        let (trend, trend_strength) = Self::trend(&quote.price_history, quote.price);
        let mut rng = rand::thread_rng();

        let direction = match trend {
            Trend::Bullish => Direction::Call,
            Trend::Bearish => Direction::Put,
            // No edge from the trend: break the tie on 24h change.
            Trend::Sideways => {
                if quote.change_24h >= 0.0 {
                    Direction::Call
                } else {
                    Direction::Put
                }
            }
        };

        // Stronger trends and calmer markets score higher; a small
        // random component keeps repeated signals from being identical.
        let confidence = (55.0
            + trend_strength * 25.0
            + (1.0 - quote.volatility) * 10.0
            + rng.gen_range(0.0..5.0))
        .clamp(0.0, 95.0);

        let entry_price = quote.price * (1.0 + rng.gen_range(-0.0001..0.0001));
        let risk_level = Self::risk_level(confidence, quote.volatility, trend_strength);
        let expiration_minutes = Self::expiration_minutes(confidence, quote.volatility);

        Ok(SignalDraft {
            direction,
            confidence,
            risk_level,
            entry_price,
            expiration_minutes,
            analysis: Self::analysis_text(trend, quote.volatility, direction, confidence),
        })
    }
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self::new()
    }
}
