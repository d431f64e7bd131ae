//! Tool breakdown endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_breakdown: Per-item expense ranking for the selection (JSON)
//! - htmx_breakdown: Top tools pie chart and table (HTML fragment)

use crate::routes::selection::{parse_selection, Selection};
use crate::AppState;
use axum::extract::Query;
use budgetweb_core::{ItemBreakdown, Workbook};
use budgetweb_utils::{format_money, sanitize_html};
use serde::Serialize;
use std::collections::HashMap;

/// Breakdown response for the JSON API
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub items: Vec<ItemBreakdown>,
    pub total_count: usize,
}

/// Per-item expense ranking for the selection (JSON API).
/// The full ranking is returned; display truncation is a UI concern.
pub async fn api_breakdown(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);

    let items = workbook.item_breakdown(&selection.months);
    let response = BreakdownResponse {
        total_count: items.len(),
        items,
    };
    serde_json::to_string(&response).unwrap_or_default()
}

/// HTMX: Top tools pie chart and ranking table
pub async fn htmx_breakdown(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);
    render_breakdown_section(&workbook, &selection)
}

/// Render the top-N tools pie chart and ranking table
pub fn render_breakdown_section(workbook: &Workbook, selection: &Selection) -> String {
    let config = workbook.config();
    let symbol = config.currency.symbol.as_str();
    let places = config.currency.decimal_places;
    let top_n = config.charts.top_items_count;

    if selection.is_empty() {
        return String::new();
    }

    let mut items = workbook.item_breakdown(&selection.months);
    items.truncate(top_n);

    if items.is_empty() {
        return "<div class='bg-white rounded-xl shadow-sm p-6 text-gray-500'>\
                No tool purchases in the selected months.</div>"
            .to_string();
    }

    let mut table_rows = String::new();
    for (rank, item) in items.iter().enumerate() {
        table_rows.push_str(&format!(
            "<tr class='border-b'><td class='py-2 px-3 text-gray-400'>{}</td>\
             <td class='py-2 px-3'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td></tr>",
            rank + 1,
            sanitize_html(&item.item_name),
            format_money(item.total_expense, symbol, places)
        ));
    }

    let chart_data = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<div class='grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Top {} Tools by Expense</h3>
                <canvas id='chart-tools'></canvas>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Tool Ranking</h3>
                <table class='w-full text-sm'>
                    <thead><tr class='border-b text-left text-gray-500'>
                        <th class='py-2 px-3'>#</th>
                        <th class='py-2 px-3'>Tool</th>
                        <th class='py-2 px-3 text-right'>Monthly Expense</th>
                    </tr></thead>
                    <tbody>{}</tbody>
                </table>
            </div>
        </div>
        <script>
        (function() {{
            const items = {};
            new Chart(document.getElementById('chart-tools'), {{
                type: 'pie',
                data: {{
                    labels: items.map(i => i.item_name),
                    datasets: [{{
                        data: items.map(i => Number(i.total_expense)),
                        backgroundColor: ['#FF6384', '#36A2EB', '#FFCE56', '#4BC0C0', '#9966FF',
                                          '#FF9F40', '#C9CBCF', '#7BC225', '#E7E9ED', '#B03060']
                    }}]
                }},
                options: {{ plugins: {{ legend: {{ display: {} }} }} }}
            }});
        }})();
        </script>"#,
        top_n,
        table_rows,
        chart_data,
        config.charts.show_legend
    )
}
