use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One validated market report from the feed.
///
/// Prices are in rupees per quintal, always >= 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub state: String,
    pub district: String,
    pub market: String,
    /// Commodity label as the feed spells it (e.g. "Bhindi(Ladies Finger)")
    pub commodity: String,
    pub variety: String,
    pub grade: String,
    /// Arrival date as received, `DD/MM/YYYY`
    pub arrival_date: String,
    /// Parsed `arrival_date`
    #[serde(skip)]
    pub arrival_day: NaiveDate,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub modal_price: Decimal,
}
