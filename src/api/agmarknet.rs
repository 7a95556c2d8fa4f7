//! data.gov.in "current daily price" (Agmarknet) client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{MarketFeed, RawRecord};
use crate::config::Config;
use crate::error::{Error, Result};

/// Response envelope. Only `records` matters to us.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    records: Vec<RawRecord>,
}

/// Decode a feed response body into its raw records.
pub fn decode_records(body: &mut [u8]) -> Result<Vec<RawRecord>> {
    let response: FeedResponse = simd_json::from_slice(body)?;
    Ok(response.records)
}

/// HTTP client for the market price feed.
#[derive(Debug, Clone)]
pub struct AgmarknetClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl AgmarknetClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mandi-price/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .timeout(config.feed.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.feed.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            page_size: config.feed.page_size,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn query_params(
        &self,
        api_key: &str,
        commodity: &str,
        region: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("api-key", api_key.to_string()),
            ("format", "json".to_string()),
            ("limit", self.page_size.to_string()),
            ("filters[Commodity]", commodity.to_string()),
        ];
        if let Some(region) = region {
            query.push(("filters[State]", region.to_string()));
        }
        query
    }
}

#[async_trait]
impl MarketFeed for AgmarknetClient {
    fn name(&self) -> &str {
        "agmarknet"
    }

    async fn fetch_records(&self, commodity: &str, region: Option<&str>) -> Result<Vec<RawRecord>> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;
        let query = self.query_params(api_key, commodity, region);

        debug!(
            "Fetching mandi prices: {} commodity={} region={:?}",
            self.base_url, commodity, region
        );

        let resp = self.client.get(&self.base_url).query(&query).send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let mut body = resp.bytes().await?.to_vec();
        let records = decode_records(&mut body)?;

        debug!("Got {} raw records for {}", records.len(), commodity);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> AgmarknetClient {
        let mut config = Config::default();
        config.credentials.api_key = api_key.map(str::to_string);
        config.feed.page_size = 50;
        AgmarknetClient::new(&config).unwrap()
    }

    #[test]
    fn test_query_params_with_region() {
        let c = client(Some("key"));
        let query = c.query_params("key", "Tomato", Some("Punjab"));
        assert_eq!(
            query,
            vec![
                ("api-key", "key".to_string()),
                ("format", "json".to_string()),
                ("limit", "50".to_string()),
                ("filters[Commodity]", "Tomato".to_string()),
                ("filters[State]", "Punjab".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_without_region() {
        let c = client(Some("key"));
        let query = c.query_params("key", "Onion", None);
        assert!(query.iter().all(|(name, _)| *name != "filters[State]"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let c = client(None);
        assert!(!c.has_api_key());
        let err = c.fetch_records("Tomato", None).await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_decode_records() {
        let mut body = br#"{
            "status": "ok",
            "total": 2,
            "records": [
                {
                    "State": "Punjab", "District": "Ludhiana", "Market": "Khanna",
                    "Commodity": "Wheat", "Variety": "Dara", "Grade": "FAQ",
                    "Arrival_Date": "02/06/2024",
                    "Min_Price": "2275", "Max_Price": "2300", "Modal_Price": "2290"
                },
                {
                    "state": "Punjab", "district": "Patiala", "market": "Rajpura",
                    "commodity": "Wheat", "variety": "Other", "grade": null,
                    "arrival_date": "02/06/2024",
                    "min_price": 2250, "max_price": 2310.5, "modal_price": "2280"
                }
            ]
        }"#
        .to_vec();

        let records = decode_records(&mut body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].market, "Khanna");
        assert_eq!(records[0].min_price, "2275");
        assert_eq!(records[1].district, "Patiala");
        assert_eq!(records[1].grade, "");
        assert_eq!(records[1].min_price, "2250");
        assert_eq!(records[1].max_price, "2310.5");
    }

    #[test]
    fn test_decode_missing_records_is_empty() {
        let mut body = br#"{"status": "ok", "total": 0}"#.to_vec();
        assert!(decode_records(&mut body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let mut body = b"<html>gateway timeout</html>".to_vec();
        assert!(matches!(decode_records(&mut body), Err(Error::Json(_))));
    }
}
