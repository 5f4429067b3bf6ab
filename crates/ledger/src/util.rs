//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the ledger enforces consistent invariants.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value).map_err(|_| LedgerError::Validation(format!("invalid {label} id")))
}

/// Validate an accounting period: month 1-12, year >= 2020.
pub(crate) fn validate_period(month: u8, year: i32) -> ResultLedger<()> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::Validation(format!("invalid month: {month}")));
    }
    if year < 2020 {
        return Err(LedgerError::Validation(format!("invalid year: {year}")));
    }
    Ok(())
}

/// Half-open date range covering one calendar month: `[first, next_first)`.
pub(crate) fn month_range(month: u8, year: i32) -> ResultLedger<(NaiveDate, NaiveDate)> {
    validate_period(month, year)?;
    let invalid = || LedgerError::Validation(format!("invalid period: {month}/{year}"));

    let first = NaiveDate::from_ymd_opt(year, u32::from(month), 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, u32::from(month) + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((first, next_first))
}

/// Derive `(month, year)` from a value date for monthly aggregation.
pub(crate) fn period_of(date: NaiveDate) -> (u8, i32) {
    use chrono::Datelike;

    (date.month() as u8, date.year())
}
