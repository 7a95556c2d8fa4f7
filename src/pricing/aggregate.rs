use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::state::{MarketRecord, PricePrediction, PriceSummary};

/// Keep only the records from the most recent arrival date.
///
/// Input order is preserved. Empty in, empty out.
pub fn latest_cohort(records: Vec<MarketRecord>) -> Vec<MarketRecord> {
    let Some(latest) = records.iter().map(|r| r.arrival_day).max() else {
        return records;
    };
    records
        .into_iter()
        .filter(|r| r.arrival_day == latest)
        .collect()
}

/// Min of mins, max of maxes, rounded mean of modals.
///
/// `None` for an empty cohort, or when the modal total does not fit a `Decimal`.
pub fn summarize(cohort: &[MarketRecord]) -> Option<PriceSummary> {
    let first = cohort.first()?;

    let mut min_price = first.min_price;
    let mut max_price = first.max_price;
    let mut modal_total = Decimal::ZERO;
    for record in cohort {
        min_price = min_price.min(record.min_price);
        max_price = max_price.max(record.max_price);
        modal_total = modal_total.checked_add(record.modal_price)?;
    }

    // Prices are non-negative, so away-from-zero is plain round-half-up
    let modal_price = modal_total
        .checked_div(Decimal::from(cohort.len()))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Some(PriceSummary {
        min_price,
        max_price,
        modal_price,
        market_count: cohort.len(),
    })
}

/// Build a prediction from validated records, or `None` if there are none.
///
/// The commodity label is taken from the feed's first cohort record.
pub fn build_prediction(records: Vec<MarketRecord>) -> Option<PricePrediction> {
    let cohort = latest_cohort(records);
    let summary = summarize(&cohort)?;
    let first = cohort.first()?;

    Some(PricePrediction {
        commodity: first.commodity.clone(),
        arrival_date: first.arrival_date.clone(),
        summary,
        records: cohort,
        fetched_at: Utc::now(),
    })
}
