//! CSV export of the signal history.
//!
//! Thin wrapper over `SignalStore::all`; the engine itself has no other
//! involvement in export formatting.

use crate::error::Result;
use crate::services::store::SignalStore;
use chrono::Utc;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

const HEADER: &str = "signal_id,pair,direction,entry_price,current_price,expiration_minutes,\
confidence,risk_level,timestamp,expiry,outcome,closed_at,analysis";

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write every stored signal to a timestamped CSV file under `dir`,
/// returning the file name.
pub fn export_csv(store: &SignalStore, dir: &str) -> Result<String> {
    let filename = format!(
        "signals_export_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    let mut body = String::new();
    body.push_str(HEADER);
    body.push('\n');

    for signal in store.all() {
        let closed_at = signal
            .closed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        let _ = writeln!(
            body,
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            signal.signal_id,
            csv_escape(&signal.pair),
            signal.direction.as_str(),
            signal.entry_price,
            signal.current_price,
            signal.expiration_minutes,
            signal.confidence,
            signal.risk_level.as_str(),
            signal.timestamp.to_rfc3339(),
            signal.expiry.to_rfc3339(),
            signal.outcome.as_str(),
            closed_at,
            csv_escape(&signal.analysis),
        );
    }

    fs::create_dir_all(dir)?;
    let path = Path::new(dir).join(&filename);
    fs::write(&path, body)?;

    info!(file = %path.display(), signals = store.len(), "signal history exported");
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Outcome, RiskLevel, Signal, SignalDraft};

    fn sample_store() -> SignalStore {
        let store = SignalStore::new();
        let signal = Signal::from_draft(
            "EUR/USD",
            SignalDraft {
                direction: Direction::Call,
                confidence: 82.5,
                risk_level: RiskLevel::Low,
                entry_price: 1.0850,
                expiration_minutes: 15,
                analysis: "momentum, with a comma".to_string(),
            },
            1.0850,
            Utc::now(),
        );
        let id = store.append(signal).unwrap();
        store.resolve_outcome(id, Outcome::Win).unwrap();
        store
    }

    #[test]
    fn test_export_writes_all_signals() {
        let store = sample_store();
        let dir = tempfile::tempdir().unwrap();

        let filename = export_csv(&store, dir.path().to_str().unwrap()).unwrap();
        assert!(filename.starts_with("signals_export_"));
        assert!(filename.ends_with(".csv"));

        let content = fs::read_to_string(dir.path().join(&filename)).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), HEADER);

        let row = lines.next().unwrap();
        assert!(row.contains("EUR/USD"));
        assert!(row.contains("CALL"));
        assert!(row.contains("win"));
        // Commas inside a field are quoted.
        assert!(row.contains("\"momentum, with a comma\""));
    }

    #[test]
    fn test_export_empty_store_writes_header_only() {
        let store = SignalStore::new();
        let dir = tempfile::tempdir().unwrap();

        let filename = export_csv(&store, dir.path().to_str().unwrap()).unwrap();
        let content = fs::read_to_string(dir.path().join(&filename)).unwrap();
        assert_eq!(content.trim_end(), HEADER);
    }
}
