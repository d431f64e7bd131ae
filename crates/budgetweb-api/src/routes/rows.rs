//! Tool detail endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_rows: Allocated rows in the selected months (JSON)
//! - htmx_rows: Tool detail table (HTML fragment)

use crate::routes::selection::{parse_selection, Selection};
use crate::AppState;
use axum::extract::Query;
use budgetweb_core::{AllocatedRow, Workbook};
use budgetweb_utils::{format_money, sanitize_html};
use serde::Serialize;
use std::collections::HashMap;

/// Rows response for the JSON API
#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<AllocatedRow>,
    pub total_count: usize,
}

/// Allocated rows in the selected months (JSON API)
pub async fn api_rows(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);

    let rows = workbook.filtered_rows(&selection.months);
    let response = RowsResponse {
        total_count: rows.len(),
        rows,
    };
    serde_json::to_string(&response).unwrap_or_default()
}

/// HTMX: Tool detail table for the selected months
pub async fn htmx_rows(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);
    render_rows_section(&workbook, &selection)
}

/// Render the tools-purchased detail table
pub fn render_rows_section(workbook: &Workbook, selection: &Selection) -> String {
    let config = workbook.config();
    let symbol = config.currency.symbol.as_str();
    let places = config.currency.decimal_places;

    if selection.is_empty() {
        return String::new();
    }

    let rows = workbook.filtered_rows(&selection.months);

    let mut table_rows = String::new();
    for row in &rows {
        table_rows.push_str(&format!(
            "<tr class='border-b'><td class='py-2 px-3'>{}</td>\
             <td class='py-2 px-3'>{}</td>\
             <td class='py-2 px-3'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td></tr>",
            row.expense_month,
            sanitize_html(&row.item_name),
            row.duration,
            format_money(row.total_value, symbol, places),
            format_money(row.monthly_expense, symbol, places)
        ));
    }

    let export_query = selection.to_query();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Tools Purchased in Selected Month(s) ({} rows)</h3>
                <div class='flex gap-2'>
                    <a href='/export/summary.csv?{}' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Export Summary</a>
                    <a href='/export/rows.csv?{}' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Export Details</a>
                </div>
            </div>
            <table class='w-full text-sm'>
                <thead><tr class='border-b text-left text-gray-500'>
                    <th class='py-2 px-3'>Expense Month</th>
                    <th class='py-2 px-3'>Short Text</th>
                    <th class='py-2 px-3'>DURATION</th>
                    <th class='py-2 px-3 text-right'>Total Value</th>
                    <th class='py-2 px-3 text-right'>Monthly Expense</th>
                </tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        rows.len(),
        export_query,
        export_query,
        table_rows
    )
}
