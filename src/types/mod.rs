pub mod market;
pub mod signal;

pub use market::{MarketQuote, MarketStatus, QuoteSource, Session, TradingSessionInfo};
pub use signal::{Direction, Outcome, RiskLevel, Signal, SignalDraft};
