pub mod export;
pub mod generator;
pub mod health;
pub mod market_data;
pub mod pairs;
pub mod performance;
pub mod resolver;
pub mod scorer;
pub mod sessions;
pub mod store;

pub use generator::SignalGenerator;
pub use health::{HealthMonitor, HealthSnapshot};
pub use market_data::MarketDataProvider;
pub use pairs::{PairInfo, PairRegistry, PairStatus};
pub use performance::{OverallStats, PairPerformance, PerformanceAggregator};
pub use resolver::{OutcomeResolver, PassSummary};
pub use scorer::{RuleBasedScorer, SignalScorer};
pub use store::SignalStore;
