use std::sync::Arc;

use crate::error::ErrorKind;
use crate::state::PricePrediction;

/// What the user asked for, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub product: String,
    /// `None` when the region box is empty
    pub region: Option<String>,
}

impl SearchQuery {
    pub fn new(product: &str, region: Option<&str>) -> Self {
        Self {
            product: product.trim().to_string(),
            region: region
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }
    }
}

// Everything the search coordinator reports to its consumer.
// Only the latest search ever produces events; superseded ones stay silent.
#[derive(Debug, Clone)]
pub enum Event {
    // Debounce elapsed, lookup started
    Loading { query: SearchQuery },

    // Lookup finished with data
    Prediction {
        query: SearchQuery,
        prediction: Arc<PricePrediction>,
    },

    // Lookup finished, feed had nothing usable
    NoData { query: SearchQuery },

    // Lookup could not run
    Failed {
        query: SearchQuery,
        kind: ErrorKind,
        message: String,
    },

    // Input too short, any shown result is withdrawn
    Cleared,
}

impl Event {
    /// Whether this event finishes the lookup for `query`.
    pub fn settles(&self, query: &SearchQuery) -> bool {
        match self {
            Event::Prediction { query: q, .. }
            | Event::NoData { query: q }
            | Event::Failed { query: q, .. } => q == query,
            Event::Loading { .. } | Event::Cleared => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_and_drops_blank_region() {
        let q = SearchQuery::new("  okra ", Some("   "));
        assert_eq!(q.product, "okra");
        assert_eq!(q.region, None);

        let q = SearchQuery::new("okra", Some(" Punjab "));
        assert_eq!(q.region.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_only_results_for_the_same_query_settle() {
        let tomato = SearchQuery::new("tomato", None);
        let onion = SearchQuery::new("onion", None);

        let no_data = Event::NoData {
            query: onion.clone(),
        };
        assert!(no_data.settles(&onion));
        assert!(!no_data.settles(&tomato));

        let loading = Event::Loading {
            query: tomato.clone(),
        };
        assert!(!loading.settles(&tomato));
        assert!(!Event::Cleared.settles(&tomato));
    }
}
