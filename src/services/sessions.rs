//! Market session calculator.
//!
//! Pure mapping from a UTC instant to the set of open trading sessions.
//! Session windows use fixed UTC hours (Tokyo 23:00-08:00, London
//! 08:00-17:00, New York 13:00-22:00) with no DST adjustment; the
//! windows never vary with the host timezone. Weekends are closed.

use crate::types::{MarketStatus, Session, TradingSessionInfo};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

fn in_window(session: Session, hour: u32) -> bool {
    match session {
        // Wraps midnight.
        Session::Asian => hour >= 23 || hour < 8,
        Session::European => (8..17).contains(&hour),
        Session::Us => (13..22).contains(&hour),
    }
}

fn is_weekend(at: DateTime<Utc>) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Sessions open at the given instant. The empty set is valid (weekends
/// and the 22:00-23:00 UTC gap).
pub fn active_sessions(at: DateTime<Utc>) -> Vec<Session> {
    if is_weekend(at) {
        return Vec::new();
    }

    let hour = at.hour();
    Session::ALL
        .into_iter()
        .filter(|s| in_window(*s, hour))
        .collect()
}

/// Full market status for the given instant.
pub fn market_status(at: DateTime<Utc>) -> MarketStatus {
    let active = active_sessions(at);
    MarketStatus {
        timestamp: at,
        market_open: !active.is_empty(),
        volatility_expected: active.len() >= 2,
        active_sessions: active,
    }
}

/// Trading-session summary for the stats endpoint.
pub fn session_info(at: DateTime<Utc>) -> TradingSessionInfo {
    let active = active_sessions(at);
    let hour = at.hour();
    TradingSessionInfo {
        current_hour: hour,
        is_peak_time: active.len() >= 2,
        next_session_change: hours_until_next_change(at),
        active_sessions: active,
    }
}

/// Whole hours from the top of the current hour until the set of open
/// sessions next changes. Walks the calendar, so the Friday close and
/// weekend gap are counted rather than assuming every day trades.
fn hours_until_next_change(at: DateTime<Utc>) -> i64 {
    let current = active_sessions(at);
    let hour_start = at
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at);

    // A full week bounds the longest stretch without a change.
    for offset in 1..=168 {
        let candidate = hour_start + chrono::Duration::hours(offset);
        if active_sessions(candidate) != current {
            return offset;
        }
    }
    168
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn weekday_at(hour: u32) -> DateTime<Utc> {
        // 2024-01-03 is a Wednesday.
        Utc.with_ymd_and_hms(2024, 1, 3, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_tokyo_only_window() {
        // 02:30 UTC: inside Tokyo's window, outside London and New York.
        let sessions = active_sessions(weekday_at(2));
        assert_eq!(sessions, vec![Session::Asian]);
    }

    #[test]
    fn test_london_new_york_overlap() {
        // 14:30 UTC: London and New York, Tokyo closed.
        let sessions = active_sessions(weekday_at(14));
        assert_eq!(sessions, vec![Session::European, Session::Us]);
    }

    #[test]
    fn test_gap_hour_is_empty() {
        // 22:30 UTC: all three windows closed.
        assert!(active_sessions(weekday_at(22)).is_empty());
    }

    #[test]
    fn test_asian_wraps_midnight() {
        assert_eq!(active_sessions(weekday_at(23)), vec![Session::Asian]);
        assert_eq!(active_sessions(weekday_at(0)), vec![Session::Asian]);
        assert_eq!(active_sessions(weekday_at(7)), vec![Session::Asian]);
        // 08:00 belongs to London, not Tokyo.
        assert_eq!(active_sessions(weekday_at(8)), vec![Session::European]);
    }

    #[test]
    fn test_weekend_is_closed() {
        let saturday = Utc.with_ymd_and_hms(2024, 1, 6, 14, 0, 0).unwrap();
        let sunday = Utc.with_ymd_and_hms(2024, 1, 7, 2, 0, 0).unwrap();
        assert!(active_sessions(saturday).is_empty());
        assert!(active_sessions(sunday).is_empty());
    }

    #[test]
    fn test_market_status_flags() {
        let overlap = market_status(weekday_at(15));
        assert!(overlap.market_open);
        assert!(overlap.volatility_expected);

        let single = market_status(weekday_at(2));
        assert!(single.market_open);
        assert!(!single.volatility_expected);

        let closed = market_status(weekday_at(22));
        assert!(!closed.market_open);
        assert!(!closed.volatility_expected);
    }

    #[test]
    fn test_next_session_change_midweek() {
        assert_eq!(hours_until_next_change(weekday_at(6)), 2); // London opens at 08
        assert_eq!(hours_until_next_change(weekday_at(14)), 3); // London closes at 17
        assert_eq!(hours_until_next_change(weekday_at(22)), 1); // Tokyo opens at 23
        assert_eq!(hours_until_next_change(weekday_at(23)), 9); // London opens tomorrow 08
    }

    #[test]
    fn test_next_session_change_spans_weekend() {
        // Friday 23:30: Tokyo is open but everything closes at the
        // Saturday boundary, not at tomorrow's London open.
        let friday_night = Utc.with_ymd_and_hms(2024, 1, 5, 23, 30, 0).unwrap();
        assert_eq!(hours_until_next_change(friday_night), 1);

        // Saturday noon: closed until Tokyo reopens Monday 00:00 UTC.
        let saturday_noon = Utc.with_ymd_and_hms(2024, 1, 6, 12, 0, 0).unwrap();
        assert_eq!(hours_until_next_change(saturday_noon), 36);

        let sunday_night = Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap();
        assert_eq!(hours_until_next_change(sunday_night), 1);
    }
}
