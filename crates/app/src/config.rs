use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Low-stock threshold, in thousands of kilograms. A snapshot is
    /// flagged low when its closing balance (KG) drops below
    /// `low_stock_threshold * 1000`.
    pub low_stock_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 1000.0,
        }
    }
}
