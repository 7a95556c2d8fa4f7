use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::api::RawRecord;
use crate::error::RecordRejection;
use crate::state::MarketRecord;

const MIN_YEAR: i32 = 1900;

/// Validate one raw feed record.
///
/// Rejects bad dates and prices that are not non-negative numbers. Text
/// fields are copied as-is.
pub fn normalize_record(raw: RawRecord) -> Result<MarketRecord, RecordRejection> {
    let arrival_day = parse_arrival_date(&raw.arrival_date)?;
    let min_price = parse_price("min_price", &raw.min_price)?;
    let max_price = parse_price("max_price", &raw.max_price)?;
    let modal_price = parse_price("modal_price", &raw.modal_price)?;

    Ok(MarketRecord {
        state: raw.state,
        district: raw.district,
        market: raw.market,
        commodity: raw.commodity,
        variety: raw.variety,
        grade: raw.grade,
        arrival_date: raw.arrival_date,
        arrival_day,
        min_price,
        max_price,
        modal_price,
    })
}

/// Parse `DD/MM/YYYY`. Day and month must be non-zero, year >= 1900, and the
/// day must exist in that month.
pub fn parse_arrival_date(text: &str) -> Result<NaiveDate, RecordRejection> {
    let invalid = || RecordRejection::InvalidDate(text.to_string());

    let mut parts = text.trim().split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let day: u32 = day.trim().parse().map_err(|_| invalid())?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;

    if day == 0 || day > 31 || month == 0 || month > 12 || year < MIN_YEAR {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_price(field: &'static str, text: &str) -> Result<Decimal, RecordRejection> {
    let trimmed = text.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| RecordRejection::InvalidPrice {
            field,
            value: text.to_string(),
        })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(RecordRejection::NegativePrice {
            field,
            value: text.to_string(),
        });
    }

    Ok(value)
}
