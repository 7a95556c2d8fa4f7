use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::MarketRecord;

/// Summary over the latest-date cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    /// Lowest `min_price` in the cohort
    pub min_price: Decimal,
    /// Highest `max_price` in the cohort
    pub max_price: Decimal,
    /// Mean `modal_price`, rounded to a whole rupee
    pub modal_price: Decimal,
    pub market_count: usize,
}

/// Suggested price for a commodity, built from the most recent reporting day.
///
/// `records` is never empty and every record shares `arrival_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePrediction {
    /// The feed's own label, which may differ from the candidate that found it.
    pub commodity: String,
    pub arrival_date: String,
    pub records: Vec<MarketRecord>,
    pub summary: PriceSummary,
    pub fetched_at: DateTime<Utc>,
}

impl PricePrediction {
    pub fn market_count(&self) -> usize {
        self.summary.market_count
    }
}
