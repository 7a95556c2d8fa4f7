use std::sync::Arc;

use crate::error::ErrorKind;
use crate::events::{Event, SearchQuery};

use super::PricePrediction;

/// What the consumer should show right now.
///
/// One variant at a time, so a spinner can never sit next to a result
/// left over from an earlier search.
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        query: SearchQuery,
    },
    Ready {
        query: SearchQuery,
        prediction: Arc<PricePrediction>,
    },
    NoData {
        query: SearchQuery,
    },
    Failed {
        query: SearchQuery,
        kind: ErrorKind,
        message: String,
    },
}

impl SearchState {
    /// Fold one coordinator event into the state.
    pub fn apply(&mut self, event: Event) {
        *self = match event {
            Event::Loading { query } => SearchState::Loading { query },
            Event::Prediction { query, prediction } => SearchState::Ready { query, prediction },
            Event::NoData { query } => SearchState::NoData { query },
            Event::Failed {
                query,
                kind,
                message,
            } => SearchState::Failed {
                query,
                kind,
                message,
            },
            Event::Cleared => SearchState::Idle,
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    pub fn prediction(&self) -> Option<&Arc<PricePrediction>> {
        match self {
            SearchState::Ready { prediction, .. } => Some(prediction),
            _ => None,
        }
    }

    /// Explanatory text for the no-data and failure states.
    pub fn message(&self) -> Option<String> {
        match self {
            SearchState::NoData { query } => {
                let place = match &query.region {
                    Some(region) => format!(" in {}", region),
                    None => String::new(),
                };
                Some(format!(
                    "No market data found for \"{}\"{}. Try another region or set the price manually.",
                    query.product, place
                ))
            }
            SearchState::Failed { kind, message, .. } => Some(match kind {
                ErrorKind::Input => message.clone(),
                ErrorKind::Unavailable | ErrorKind::Upstream => {
                    "Market prices are temporarily unavailable. Please try again shortly."
                        .to_string()
                }
            }),
            _ => None,
        }
    }
}
