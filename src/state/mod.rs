mod cache;
mod prediction;
mod record;
mod search;

pub use cache::{cache_key, CacheEntry, PredictionCache, DEFAULT_TTL};
pub use prediction::{PricePrediction, PriceSummary};
pub use record::MarketRecord;
pub use search::SearchState;
