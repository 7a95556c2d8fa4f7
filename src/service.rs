//! Price lookup entry point shared by the CLI and the search coordinator.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::AgmarknetClient;
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::pricing::{CommodityResolver, MarketFetcher};
use crate::state::{cache_key, PredictionCache, PricePrediction};

/// Answer shape at the inbound boundary.
///
/// Serializes as `{"prediction": ...}` (null when the feed had nothing) or
/// `{"error": "...", "kind": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Found {
        prediction: Option<PricePrediction>,
    },
    Failed {
        error: String,
        kind: ErrorKind,
    },
}

impl From<Result<Option<Arc<PricePrediction>>>> for QueryResponse {
    fn from(outcome: Result<Option<Arc<PricePrediction>>>) -> Self {
        match outcome {
            Ok(prediction) => QueryResponse::Found {
                prediction: prediction.map(|p| p.as_ref().clone()),
            },
            Err(e) => QueryResponse::Failed {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

pub struct PriceService {
    resolver: CommodityResolver,
    fetcher: MarketFetcher,
    cache: Arc<PredictionCache>,
}

impl PriceService {
    pub fn new(resolver: CommodityResolver, fetcher: MarketFetcher, cache: Arc<PredictionCache>) -> Self {
        Self {
            resolver,
            fetcher,
            cache,
        }
    }

    /// Wire up the data.gov.in client, config synonyms and a fresh cache.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let feed = Arc::new(AgmarknetClient::new(config)?);
        let fetcher = MarketFetcher::new(feed, config.feed.timeout());
        let resolver = CommodityResolver::with_synonyms(config.synonym_entries()?);
        let cache = Arc::new(PredictionCache::new(config.cache.ttl()));
        Ok(Self::new(resolver, fetcher, cache))
    }

    pub fn cache(&self) -> &Arc<PredictionCache> {
        &self.cache
    }

    /// Cached or freshly fetched prediction for a product, `Ok(None)` if the
    /// feed has nothing usable. Only found predictions are cached.
    #[instrument(skip(self))]
    pub async fn predict(
        &self,
        product: &str,
        region: Option<&str>,
    ) -> Result<Option<Arc<PricePrediction>>> {
        let product = product.trim();
        if product.is_empty() {
            return Err(Error::MissingProductName);
        }
        let region = region.map(str::trim).filter(|r| !r.is_empty());

        let key = cache_key(product, region);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit));
        }
        debug!("cache miss: {}", key);

        let candidates = self.resolver.resolve(product);
        debug!("candidates for {:?}: {:?}", product, candidates);

        match self.fetcher.fetch(&candidates, region).await? {
            Some(prediction) => {
                let prediction = Arc::new(prediction);
                self.cache.put(key, prediction.clone());
                Ok(Some(prediction))
            }
            None => Ok(None),
        }
    }

    /// `predict` at the boundary, where the product name may be missing.
    pub async fn query(&self, product: Option<&str>, region: Option<&str>) -> QueryResponse {
        let outcome = match product {
            Some(product) => self.predict(product, region).await,
            None => Err(Error::MissingProductName),
        };
        outcome.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::pricing::testing::{raw, Reply, ScriptedFeed};
    use crate::pricing::DEFAULT_FETCH_TIMEOUT;

    fn service(feed: Arc<ScriptedFeed>) -> PriceService {
        PriceService::new(
            CommodityResolver::new(),
            MarketFetcher::new(feed, DEFAULT_FETCH_TIMEOUT),
            Arc::new(PredictionCache::default()),
        )
    }

    fn wheat_feed() -> Arc<ScriptedFeed> {
        Arc::new(ScriptedFeed::new().reply(
            "Wheat",
            Reply::Records(vec![
                raw("Wheat", "Khanna", "02/06/2024", "2275", "2300", "2290"),
                raw("Wheat", "Rajpura", "02/06/2024", "2250", "2320", "2295"),
            ]),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_for_an_hour() {
        let feed = wheat_feed();
        let service = service(feed.clone());

        let first = service.predict("wheat", Some("Punjab")).await.unwrap().unwrap();
        assert_eq!(feed.call_count(), 1);
        assert_eq!(feed.calls()[0], ("Wheat".to_string(), Some("Punjab".to_string())));

        tokio::time::advance(Duration::from_secs(30 * 60)).await;
        let second = service.predict("Wheat ", Some("punjab")).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(feed.call_count(), 1);

        tokio::time::advance(Duration::from_secs(31 * 60)).await;
        let third = service.predict("wheat", Some("Punjab")).await.unwrap().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(feed.call_count(), 2);
    }

    #[tokio::test]
    async fn test_region_is_part_of_the_key() {
        let feed = wheat_feed();
        let service = service(feed.clone());

        service.predict("wheat", Some("Punjab")).await.unwrap();
        service.predict("wheat", None).await.unwrap();
        assert_eq!(feed.call_count(), 2);
        assert_eq!(feed.calls()[1].1, None);
    }

    #[tokio::test]
    async fn test_no_data_is_not_cached() {
        let feed = Arc::new(ScriptedFeed::new());
        let service = service(feed.clone());

        assert!(service.predict("tomato", None).await.unwrap().is_none());
        assert!(service.cache().get(&cache_key("tomato", None)).is_none());
        assert!(service.cache().is_empty());

        assert!(service.predict("tomato", None).await.unwrap().is_none());
        assert_eq!(feed.call_count(), 2);
    }

    #[tokio::test]
    async fn test_resolved_candidates_are_tried() {
        let feed = Arc::new(ScriptedFeed::new());
        let service = service(feed.clone());

        service.predict("okra", None).await.unwrap();
        assert_eq!(feed.commodities_called(), vec!["Bhindi(Ladies Finger)"]);
    }

    #[tokio::test]
    async fn test_empty_product_rejected_without_network() {
        let feed = wheat_feed();
        let service = service(feed.clone());

        let err = service.predict("   ", None).await.unwrap_err();
        assert!(matches!(err, Error::MissingProductName));
        assert_eq!(feed.call_count(), 0);
    }

    #[tokio::test]
    async fn test_query_response_shapes() {
        let feed = wheat_feed();
        let service = service(feed);

        let found = serde_json::to_value(service.query(Some("wheat"), None).await).unwrap();
        assert_eq!(found["prediction"]["commodity"], "Wheat");
        assert_eq!(found["prediction"]["summary"]["marketCount"], 2);
        assert_eq!(found["prediction"]["summary"]["modalPrice"], "2293");

        let empty = serde_json::to_value(service.query(Some("quinoa"), None).await).unwrap();
        assert!(empty["prediction"].is_null());

        let missing = serde_json::to_value(service.query(None, None).await).unwrap();
        assert_eq!(missing["kind"], "input");
        assert_eq!(missing["error"], "product name is required");
    }

    #[tokio::test]
    async fn test_missing_key_reported_as_unavailable() {
        let feed = Arc::new(ScriptedFeed::new().reply("Tomato", Reply::MissingKey));
        let service = service(feed);

        let response = serde_json::to_value(service.query(Some("tomato"), None).await).unwrap();
        assert_eq!(response["kind"], "unavailable");
    }
}
