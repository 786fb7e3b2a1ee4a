use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named geographic trading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    /// Tokyo, 23:00-08:00 UTC (wraps midnight).
    Asian,
    /// London, 08:00-17:00 UTC.
    European,
    /// New York, 13:00-22:00 UTC.
    Us,
}

impl Session {
    pub const ALL: [Session; 3] = [Session::Asian, Session::European, Session::Us];

    pub fn name(&self) -> &'static str {
        match self {
            Session::Asian => "asian",
            Session::European => "european",
            Session::Us => "us",
        }
    }
}

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    AlphaVantage,
    ExchangeRateApi,
    Simulated,
}

/// A point-in-time market quote for a currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub pair: String,
    pub price: f64,
    pub bid: f64,
    pub ask: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    /// Relative volume indicator, not a raw contract count.
    pub volume: f64,
    /// Fractional 24h change, e.g. 0.012 for +1.2%.
    pub change_24h: f64,
    /// Estimated daily volatility in [0, 1].
    pub volatility: f64,
    /// Recent prices, oldest first.
    pub price_history: Vec<f64>,
    pub timestamp: DateTime<Utc>,
    pub source: QuoteSource,
}

/// Market-session state at a given instant. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MarketStatus {
    pub timestamp: DateTime<Utc>,
    pub active_sessions: Vec<Session>,
    pub market_open: bool,
    /// True during session overlaps, when movement is typically larger.
    pub volatility_expected: bool,
}

/// Trading-session summary embedded in the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TradingSessionInfo {
    pub current_hour: u32,
    pub active_sessions: Vec<Session>,
    pub is_peak_time: bool,
    /// Hours until the next session opens or closes.
    pub next_session_change: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_format() {
        assert_eq!(serde_json::to_string(&Session::Asian).unwrap(), "\"asian\"");
        assert_eq!(
            serde_json::to_string(&Session::European).unwrap(),
            "\"european\""
        );
        assert_eq!(serde_json::to_string(&Session::Us).unwrap(), "\"us\"");
    }

    #[test]
    fn test_session_names_match_serde() {
        for session in Session::ALL {
            let json = serde_json::to_string(&session).unwrap();
            assert_eq!(json, format!("\"{}\"", session.name()));
        }
    }
}
