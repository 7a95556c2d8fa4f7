//! Debounced, last-call-wins search driver.
//!
//! Every call to [`SearchCoordinator::search`] bumps a generation counter.
//! Work started for an older generation keeps running but is never allowed
//! to emit an event once a newer call exists. The check and the send happen
//! under one lock, so an old result cannot slip in after a newer event.
//! The channel is unbounded so a slow consumer never stalls `search`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tracing::debug;

use crate::config::SearchConfig;
use crate::events::{Event, SearchQuery};
use crate::service::PriceService;

struct Delivery {
    generation: u64,
    tx: mpsc::UnboundedSender<Event>,
}

impl Delivery {
    /// Send `event` only if `generation` is still the newest search.
    fn emit(&self, generation: u64, event: Event) -> bool {
        if generation != self.generation {
            debug!(
                "discarding stale result (generation {} < {})",
                generation, self.generation
            );
            return false;
        }
        // A closed channel just means nobody is listening anymore
        self.tx.send(event).is_ok()
    }
}

pub struct SearchCoordinator {
    service: Arc<PriceService>,
    delivery: Arc<Mutex<Delivery>>,
    debounce: Duration,
    min_query_chars: usize,
}

impl SearchCoordinator {
    pub fn new(
        service: Arc<PriceService>,
        config: &SearchConfig,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            service,
            delivery: Arc::new(Mutex::new(Delivery { generation: 0, tx })),
            debounce: config.debounce(),
            min_query_chars: config.min_query_chars,
        }
    }

    /// Handle one change of the product/region inputs.
    ///
    /// Short input clears the result at once. Otherwise the lookup starts
    /// after the debounce window unless another call arrives first.
    pub async fn search(&self, product: &str, region: Option<&str>) {
        let query = SearchQuery::new(product, region);

        let generation = {
            let mut delivery = self.delivery.lock().await;
            delivery.generation += 1;
            let generation = delivery.generation;

            if query.product.chars().count() < self.min_query_chars {
                debug!("query {:?} too short, clearing", query.product);
                delivery.emit(generation, Event::Cleared);
                return;
            }
            generation
        };

        let service = self.service.clone();
        let delivery = self.delivery.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            sleep(debounce).await;

            let loading = Event::Loading {
                query: query.clone(),
            };
            let still_current = delivery.lock().await.emit(generation, loading);
            if !still_current {
                return;
            }

            let outcome = service
                .predict(&query.product, query.region.as_deref())
                .await;

            let event = match outcome {
                Ok(Some(prediction)) => Event::Prediction { query, prediction },
                Ok(None) => Event::NoData { query },
                Err(e) => Event::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                    query,
                },
            };

            delivery.lock().await.emit(generation, event);
        });
    }

    /// Supersede whatever is pending without starting anything new.
    pub async fn cancel(&self) {
        self.delivery.lock().await.generation += 1;
    }
}
