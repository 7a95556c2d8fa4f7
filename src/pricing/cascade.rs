use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::aggregate::build_prediction;
use super::normalize::normalize_record;
use crate::api::MarketFeed;
use crate::error::{Error, Result};
use crate::state::{MarketRecord, PricePrediction};

/// Per-candidate request budget.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Tries candidate labels against the feed one at a time until one yields
/// usable records.
#[derive(Clone)]
pub struct MarketFetcher {
    feed: Arc<dyn MarketFeed>,
    timeout: Duration,
}

impl MarketFetcher {
    pub fn new(feed: Arc<dyn MarketFeed>, timeout: Duration) -> Self {
        Self { feed, timeout }
    }

    /// First candidate with at least one valid record wins.
    ///
    /// Transport failures, timeouts, empty answers and all-invalid batches
    /// move on to the next candidate. `Ok(None)` means every candidate came
    /// up empty. Only fatal errors (e.g. no access key) are returned.
    pub async fn fetch(
        &self,
        candidates: &[String],
        region: Option<&str>,
    ) -> Result<Option<PricePrediction>> {
        for (attempt, commodity) in candidates.iter().enumerate() {
            debug!(
                "[{}] candidate {}/{}: {} region={:?}",
                self.feed.name(),
                attempt + 1,
                candidates.len(),
                commodity,
                region
            );

            let raw = match timeout(self.timeout, self.feed.fetch_records(commodity, region)).await
            {
                Ok(Ok(raw)) => raw,
                Ok(Err(e)) if e.is_fatal() => return Err(e),
                Ok(Err(e)) => {
                    warn!("[{}] {} failed: {}", self.feed.name(), commodity, e);
                    continue;
                }
                Err(_) => {
                    warn!(
                        "[{}] {} failed: {}",
                        self.feed.name(),
                        commodity,
                        Error::Timeout(self.timeout)
                    );
                    continue;
                }
            };

            if raw.is_empty() {
                debug!("[{}] no records for {}", self.feed.name(), commodity);
                continue;
            }

            let received = raw.len();
            let valid: Vec<MarketRecord> = raw
                .into_iter()
                .filter_map(|record| match normalize_record(record) {
                    Ok(record) => Some(record),
                    Err(rejection) => {
                        debug!("dropping record for {}: {}", commodity, rejection);
                        None
                    }
                })
                .collect();

            if valid.is_empty() {
                debug!(
                    "[{}] all {} records for {} were invalid",
                    self.feed.name(),
                    received,
                    commodity
                );
                continue;
            }

            if let Some(prediction) = build_prediction(valid) {
                info!(
                    "[{}] {} → {} markets on {} (modal {})",
                    self.feed.name(),
                    commodity,
                    prediction.market_count(),
                    prediction.arrival_date,
                    prediction.summary.modal_price
                );
                return Ok(Some(prediction));
            }
            warn!(
                "[{}] {} prices too large to summarize, skipping",
                self.feed.name(),
                commodity
            );
        }

        info!(
            "[{}] no usable data for any of {:?} region={:?}",
            self.feed.name(),
            candidates,
            region
        );
        Ok(None)
    }
}
