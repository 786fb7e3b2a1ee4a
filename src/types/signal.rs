use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Price expected to rise above the entry by expiry.
    #[serde(rename = "CALL")]
    Call,
    /// Price expected to fall below the entry by expiry.
    #[serde(rename = "PUT")]
    Put,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Call => "CALL",
            Direction::Put => "PUT",
        }
    }
}

/// Coarse risk label attached to a signal by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Resolution state of a signal.
///
/// Transitions exactly once, Pending -> Win or Pending -> Loss, and never
/// reverts. Repeated resolution attempts are rejected with
/// `InvalidTransition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Win,
    Loss,
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "pending",
            Outcome::Win => "win",
            Outcome::Loss => "loss",
        }
    }
}

/// Scorer output before the engine assigns identity and timestamps.
#[derive(Debug, Clone)]
pub struct SignalDraft {
    pub direction: Direction,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub entry_price: f64,
    pub expiration_minutes: i64,
    pub analysis: String,
}

/// A single directional trading recommendation with confidence and risk
/// metadata, tracked from creation through outcome resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub signal_id: Uuid,
    pub pair: String,
    pub direction: Direction,
    pub entry_price: f64,
    /// Market price observed when the signal was created.
    pub current_price: f64,
    pub expiration_minutes: i64,
    /// Confidence in [0, 100].
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub analysis: String,
    /// Creation instant, UTC.
    pub timestamp: DateTime<Utc>,
    /// Instant after which the outcome becomes resolvable.
    pub expiry: DateTime<Utc>,
    pub outcome: Outcome,
    /// Set once when the outcome is resolved.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Signal {
    /// Build a signal from a scorer draft. The store validates domain
    /// constraints on append.
    pub fn from_draft(
        pair: &str,
        draft: SignalDraft,
        current_price: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = now + chrono::Duration::minutes(draft.expiration_minutes.max(0));
        Self {
            signal_id: Uuid::new_v4(),
            pair: pair.to_string(),
            direction: draft.direction,
            entry_price: draft.entry_price,
            current_price,
            expiration_minutes: draft.expiration_minutes,
            confidence: draft.confidence,
            risk_level: draft.risk_level,
            analysis: draft.analysis,
            timestamp: now,
            expiry,
            outcome: Outcome::Pending,
            closed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == Outcome::Pending
    }

    /// Whether the signal is old enough for the resolver to evaluate.
    pub fn is_resolvable(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.expiry <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SignalDraft {
        SignalDraft {
            direction: Direction::Call,
            confidence: 81.5,
            risk_level: RiskLevel::Medium,
            entry_price: 1.0852,
            expiration_minutes: 15,
            analysis: "test".to_string(),
        }
    }

    #[test]
    fn test_from_draft_starts_pending() {
        let now = Utc::now();
        let signal = Signal::from_draft("EUR/USD", draft(), 1.0851, now);

        assert_eq!(signal.outcome, Outcome::Pending);
        assert!(signal.closed_at.is_none());
        assert_eq!(signal.timestamp, now);
        assert_eq!(signal.expiry, now + chrono::Duration::minutes(15));
        assert!(signal.timestamp <= signal.expiry);
    }

    #[test]
    fn test_resolvable_only_after_expiry() {
        let now = Utc::now();
        let signal = Signal::from_draft("EUR/USD", draft(), 1.0851, now);

        assert!(!signal.is_resolvable(now));
        assert!(!signal.is_resolvable(now + chrono::Duration::minutes(14)));
        assert!(signal.is_resolvable(now + chrono::Duration::minutes(15)));
        assert!(signal.is_resolvable(now + chrono::Duration::hours(2)));
    }

    #[test]
    fn test_direction_wire_format() {
        assert_eq!(serde_json::to_string(&Direction::Call).unwrap(), "\"CALL\"");
        assert_eq!(serde_json::to_string(&Direction::Put).unwrap(), "\"PUT\"");
    }

    #[test]
    fn test_risk_level_wire_format() {
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"LOW\"");
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(
            serde_json::to_string(&Outcome::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&Outcome::Loss).unwrap(), "\"loss\"");
    }

    #[test]
    fn test_signal_json_round_trip() {
        let signal = Signal::from_draft("GBP/JPY", draft(), 187.80, Utc::now());
        let json = serde_json::to_string(&signal).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();

        assert_eq!(back.signal_id, signal.signal_id);
        assert_eq!(back.pair, "GBP/JPY");
        assert_eq!(back.direction, Direction::Call);
        assert_eq!(back.outcome, Outcome::Pending);
    }
}
