use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Alpha Vantage API key. When set, Alpha Vantage is the primary
    /// quote source; the public exchange-rate feed is the fallback and
    /// the only live source without a key.
    pub alpha_vantage_api_key: Option<String>,
    /// Minimum confidence a generated signal must carry.
    pub min_confidence: f64,
    /// Quote cache freshness window in seconds.
    pub quote_cache_ttl_secs: u64,
    /// Timeout for outbound market-data requests in seconds.
    pub market_data_timeout_secs: u64,
    /// Interval between outcome-resolution passes in seconds.
    pub resolver_interval_secs: u64,
    /// Directory for CSV exports.
    pub export_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            alpha_vantage_api_key: env::var("ALPHA_VANTAGE_API_KEY").ok(),
            min_confidence: env::var("MIN_SIGNAL_CONFIDENCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(70.0),
            quote_cache_ttl_secs: env::var("MARKET_DATA_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            market_data_timeout_secs: env::var("MARKET_DATA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            resolver_interval_secs: env::var("RESOLVER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            export_dir: env::var("EXPORT_DIR").unwrap_or_else(|_| "data".to_string()),
        }
    }

    /// Validate configuration and return any issues. Issues are
    /// reported, not fatal.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(50.0..=95.0).contains(&self.min_confidence) {
            issues.push("MIN_SIGNAL_CONFIDENCE should be between 50-95".to_string());
        }
        if self.market_data_timeout_secs == 0 {
            issues.push("MARKET_DATA_TIMEOUT_SECS must be at least 1".to_string());
        }
        if self.resolver_interval_secs < 5 {
            issues.push("RESOLVER_INTERVAL_SECS should be at least 5 seconds".to_string());
        }

        issues
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
