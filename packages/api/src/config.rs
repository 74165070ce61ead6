use std::env;

pub const DEFAULT_WAREHOUSE_LOCATION: &str = "Warehouse";
pub const DEFAULT_PAID_STATUS: &str = "paid";

/// Business rules the aggregate queries are parameterized with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Pseudo-location holding stock; it has no door counter and never sells
    /// over the counter, so it is left out of store rankings
    pub warehouse_location: String,
    /// Financial status that marks an order as a completed sale
    pub paid_status: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            warehouse_location: DEFAULT_WAREHOUSE_LOCATION.to_string(),
            paid_status: DEFAULT_PAID_STATUS.to_string(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            warehouse_location: non_empty_var("WAREHOUSE_LOCATION")
                .unwrap_or(defaults.warehouse_location),
            paid_status: non_empty_var("PAID_FINANCIAL_STATUS").unwrap_or(defaults.paid_status),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub sql_logging: bool,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.warehouse_location, "Warehouse");
        assert_eq!(config.paid_status, "paid");
    }
}
