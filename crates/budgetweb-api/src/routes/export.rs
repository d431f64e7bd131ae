//! CSV report downloads
//!
//! Endpoints:
//! - export_summary_csv: Summary table for the selection
//! - export_rows_csv: Tool detail table for the selection
//!
//! Both consume the same tables the dashboard renders, verbatim.

use crate::routes::selection::parse_selection;
use crate::AppState;
use axum::extract::Query;
use axum::http::header;
use axum::response::IntoResponse;
use budgetweb_core::{AllocatedRow, MonthlySummary};
use std::collections::HashMap;

/// Serialize the monthly summary table to CSV
pub fn summary_csv(summaries: &[MonthlySummary]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let _ = writer.write_record(["Expense Month", "Total Expense", "Bus KM", "Per KM Expense"]);
    for summary in summaries {
        let _ = writer.write_record([
            summary.month.to_string(),
            summary.total_expense.to_string(),
            summary.distance_km.map(|d| d.to_string()).unwrap_or_default(),
            summary
                .per_km_expense
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ]);
    }
    String::from_utf8(writer.into_inner().unwrap_or_default()).unwrap_or_default()
}

/// Serialize the tool detail table to CSV
pub fn rows_csv(rows: &[AllocatedRow]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let _ = writer.write_record([
        "Expense Month",
        "Short Text",
        "DURATION",
        "Total Value",
        "Monthly Expense",
    ]);
    for row in rows {
        let _ = writer.write_record([
            row.expense_month.to_string(),
            row.item_name.clone(),
            row.duration.to_string(),
            row.total_value.to_string(),
            row.monthly_expense.to_string(),
        ]);
    }
    String::from_utf8(writer.into_inner().unwrap_or_default()).unwrap_or_default()
}

fn csv_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Download the summary table for the selection
pub async fn export_summary_csv(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);
    let summaries = workbook.monthly_summaries(&selection.months, &selection.distances);
    csv_attachment("budget_summary.csv", summary_csv(&summaries))
}

/// Download the tool detail table for the selection
pub async fn export_rows_csv(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);
    let rows = workbook.filtered_rows(&selection.months);
    csv_attachment("budget_tools.csv", rows_csv(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetweb_core::DurationKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_csv_shape() {
        let summaries = vec![MonthlySummary {
            month: "2024-01".parse().unwrap(),
            total_expense: dec!(150),
            distance_km: Some(dec!(100)),
            per_km_expense: Some(dec!(1.5)),
        }];
        let csv = summary_csv(&summaries);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Expense Month,Total Expense,Bus KM,Per KM Expense")
        );
        assert_eq!(lines.next(), Some("2024-01,150,100,1.5"));
    }

    #[test]
    fn test_summary_csv_blank_metric_when_undefined() {
        let summaries = vec![MonthlySummary {
            month: "2024-02".parse().unwrap(),
            total_expense: dec!(30),
            distance_km: None,
            per_km_expense: None,
        }];
        let csv = summary_csv(&summaries);
        assert!(csv.lines().nth(1).unwrap().ends_with("30,,"));
    }

    #[test]
    fn test_rows_csv_shape() {
        let rows = vec![AllocatedRow {
            expense_month: "2024-01".parse().unwrap(),
            item_name: "Drill, cordless".to_string(),
            duration: DurationKind::Yearly,
            total_value: dec!(1200),
            monthly_expense: dec!(100),
        }];
        let csv = rows_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Expense Month,Short Text,DURATION,Total Value,Monthly Expense")
        );
        // Comma in the item name must be quoted
        assert_eq!(lines.next(), Some("2024-01,\"Drill, cordless\",YEARLY,1200,100"));
    }
}
