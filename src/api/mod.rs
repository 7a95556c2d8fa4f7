pub mod agmarknet;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::Result;

pub use agmarknet::AgmarknetClient;

/// One mandi price report exactly as the feed sends it. Every field is text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "State", alias = "state", default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(rename = "District", alias = "district", default, deserialize_with = "lenient_string")]
    pub district: String,
    #[serde(rename = "Market", alias = "market", default, deserialize_with = "lenient_string")]
    pub market: String,
    #[serde(rename = "Commodity", alias = "commodity", default, deserialize_with = "lenient_string")]
    pub commodity: String,
    #[serde(rename = "Variety", alias = "variety", default, deserialize_with = "lenient_string")]
    pub variety: String,
    #[serde(rename = "Grade", alias = "grade", default, deserialize_with = "lenient_string")]
    pub grade: String,
    /// `DD/MM/YYYY`
    #[serde(rename = "Arrival_Date", alias = "arrival_date", default, deserialize_with = "lenient_string")]
    pub arrival_date: String,
    #[serde(rename = "Min_Price", alias = "min_price", default, deserialize_with = "lenient_string")]
    pub min_price: String,
    #[serde(rename = "Max_Price", alias = "max_price", default, deserialize_with = "lenient_string")]
    pub max_price: String,
    #[serde(rename = "Modal_Price", alias = "modal_price", default, deserialize_with = "lenient_string")]
    pub modal_price: String,
}

// Some feed mirrors send prices as JSON numbers, and nulls for blank cells.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Source of raw price reports, one call per commodity label.
///
/// Implementations report transport problems as errors; an empty `Vec` means
/// the feed answered but had nothing for that label.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_records(&self, commodity: &str, region: Option<&str>) -> Result<Vec<RawRecord>>;
}
