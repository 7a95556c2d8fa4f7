mod aggregate;
mod cascade;
mod normalize;
mod resolver;

pub use aggregate::{build_prediction, latest_cohort, summarize};
pub use cascade::{MarketFetcher, DEFAULT_FETCH_TIMEOUT};
pub use normalize::{normalize_record, parse_arrival_date};
pub use resolver::CommodityResolver;

#[cfg(test)]
pub(crate) use cascade::testing;
