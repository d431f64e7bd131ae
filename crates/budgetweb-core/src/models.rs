//! Row models for the expense pipeline
//!
//! Normalization is a total function: every raw row produces a
//! `NormalizedRow`, with malformed cells degraded to `None` fields.
//! Exclusion happens afterwards, in the explicit allocation filter, so
//! dropped rows stay countable.

use budgetweb_parser::RawSheetRow;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::types::{DurationKind, MonthKey};

/// Date formats accepted for sheet cells, tried in order. Budget sheet
/// exports are day-first ("05/03/2024" is 5 March). The two-digit-year
/// form must come before the four-digit one: %Y would accept "24" as the
/// year 24.
const DATE_FORMATS: [&str; 5] = ["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Datetime formats seen in sheet exports that carry a time component
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Parse a date cell. Returns None for empty or unparseable cells.
pub fn parse_sheet_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a currency-formatted cell: strip thousands separators, then
/// parse as a decimal. Returns None on failure.
pub fn parse_amount(cell: &str) -> Option<Decimal> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// A sheet row after cell coercion; 1:1 with the raw rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Item name (passthrough of `Short Text`)
    pub item_name: String,
    /// Purchase value; None if the cell was unparseable
    pub total_value: Option<Decimal>,
    /// Duration classification
    pub duration: DurationKind,
    /// Month the expense is attributed to: release-date month, falling
    /// back to delivery-date month; None if both dates failed to parse
    pub expense_month: Option<MonthKey>,
}

/// A row that passed allocation: both the monthly expense and the
/// expense month are present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatedRow {
    /// Month the expense is attributed to
    pub expense_month: MonthKey,
    /// Item name
    pub item_name: String,
    /// Duration classification (Monthly or Yearly here)
    pub duration: DurationKind,
    /// Original purchase value
    pub total_value: Decimal,
    /// Monthly-equivalent expense
    pub monthly_expense: Decimal,
}

/// Normalize one raw row. Total: never fails, never drops.
pub fn normalize_row(raw: &RawSheetRow) -> NormalizedRow {
    let release = parse_sheet_date(&raw.release_date);
    let delivery = parse_sheet_date(&raw.delivery_date);

    NormalizedRow {
        item_name: raw.short_text.clone(),
        total_value: parse_amount(&raw.total_value),
        duration: DurationKind::classify(&raw.duration),
        expense_month: release.or(delivery).map(MonthKey::from_date),
    }
}

/// Compute the monthly-equivalent expense for a normalized row.
///
/// Monthly purchases allocate at full value, yearly at value / 12 (exact
/// decimal division). Unclassified durations and missing values are
/// unallocable. A yearly purchase of value 0 allocates 0; zero is a valid
/// expense, distinct from unallocable.
pub fn allocate(row: &NormalizedRow) -> Option<Decimal> {
    match (row.duration, row.total_value) {
        (DurationKind::Monthly, Some(value)) => Some(value),
        (DurationKind::Yearly, Some(value)) => Some(value / Decimal::from(12)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(
        total_value: &str,
        duration: &str,
        release_date: &str,
        delivery_date: &str,
        short_text: &str,
    ) -> RawSheetRow {
        RawSheetRow {
            total_value: total_value.to_string(),
            duration: duration.to_string(),
            release_date: release_date.to_string(),
            delivery_date: delivery_date.to_string(),
            short_text: short_text.to_string(),
            extra: Vec::new(),
        }
    }

    #[test]
    fn test_parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("1,200.50"), Some(dec!(1200.50)));
        assert_eq!(parse_amount(" 12,345 "), Some(dec!(12345)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12.3.4"), None);
    }

    #[test]
    fn test_parse_sheet_date_is_day_first() {
        let date = parse_sheet_date("05/03/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_sheet_date_two_digit_year() {
        let date = parse_sheet_date("05/03/24").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_sheet_date_accepts_iso() {
        let date = parse_sheet_date("2024-03-05").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_sheet_date_accepts_export_datetime() {
        let date = parse_sheet_date("2024-03-05 00:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_sheet_date_rejects_garbage() {
        assert_eq!(parse_sheet_date("soon"), None);
        assert_eq!(parse_sheet_date("32/01/2024"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn test_expense_month_prefers_release_date() {
        let row = normalize_row(&raw("100", "MONTHLY", "05/03/2024", "10/04/2024", "Drill"));
        assert_eq!(row.expense_month, MonthKey::new(2024, 3));
    }

    #[test]
    fn test_expense_month_falls_back_to_delivery_date() {
        let row = normalize_row(&raw("100", "MONTHLY", "not a date", "15/01/2024", "Drill"));
        assert_eq!(row.expense_month, MonthKey::new(2024, 1));
    }

    #[test]
    fn test_expense_month_none_when_both_dates_fail() {
        let row = normalize_row(&raw("100", "MONTHLY", "", "pending", "Drill"));
        assert_eq!(row.expense_month, None);
    }

    #[test]
    fn test_normalize_never_fails_on_malformed_cells() {
        let row = normalize_row(&raw("n/a", "???", "??", "??", "Mystery"));
        assert_eq!(row.total_value, None);
        assert_eq!(row.duration, DurationKind::Other);
        assert_eq!(row.expense_month, None);
        assert_eq!(row.item_name, "Mystery");
    }

    #[test]
    fn test_allocate_monthly_at_full_value() {
        let row = normalize_row(&raw("450.25", "MONTHLY", "01/01/2024", "", "Drill"));
        assert_eq!(allocate(&row), Some(dec!(450.25)));
    }

    #[test]
    fn test_allocate_yearly_divides_by_twelve_exactly() {
        let row = normalize_row(&raw("1200", "YEARLY", "01/01/2024", "", "License"));
        assert_eq!(allocate(&row), Some(dec!(100)));
    }

    #[test]
    fn test_allocate_yearly_zero_is_zero_not_none() {
        let row = normalize_row(&raw("0", "YEARLY", "01/01/2024", "", "Freebie"));
        assert_eq!(allocate(&row), Some(dec!(0)));
    }

    #[test]
    fn test_allocate_other_duration_is_unallocable() {
        let row = normalize_row(&raw("100", "ONE-TIME", "01/01/2024", "", "Crane"));
        assert_eq!(allocate(&row), None);
    }

    #[test]
    fn test_allocate_missing_value_is_unallocable() {
        let row = normalize_row(&raw("abc", "MONTHLY", "01/01/2024", "", "Drill"));
        assert_eq!(allocate(&row), None);
    }
}
