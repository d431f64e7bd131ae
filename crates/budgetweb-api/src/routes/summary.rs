//! Summary endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_summary: Monthly summaries + KPIs for the selection (JSON)
//! - htmx_summary: KPI tiles, summary table and charts (HTML fragment)

use crate::routes::selection::{parse_selection, Selection};
use crate::AppState;
use axum::extract::Query;
use budgetweb_core::{MonthlySummary, SummaryKpis, Workbook};
use budgetweb_utils::format_money;
use serde::Serialize;
use std::collections::HashMap;

/// Summary response for the JSON API
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summaries: Vec<MonthlySummary>,
    pub kpis: SummaryKpis,
}

/// Monthly summaries and KPIs for the selection (JSON API)
pub async fn api_summary(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);

    let summaries = workbook.monthly_summaries(&selection.months, &selection.distances);
    let response = SummaryResponse {
        kpis: budgetweb_core::summary_kpis(&summaries),
        summaries,
    };
    serde_json::to_string(&response).unwrap_or_default()
}

/// HTMX: KPI tiles, summary table and charts for the selection
pub async fn htmx_summary(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = parse_selection(&params);
    render_summary_section(&workbook, &selection)
}

/// Render the KPI tiles, summary table and the expense/per-km charts
pub fn render_summary_section(workbook: &Workbook, selection: &Selection) -> String {
    let config = workbook.config();
    let symbol = config.currency.symbol.as_str();
    let places = config.currency.decimal_places;

    if selection.is_empty() {
        return "<div class='bg-white rounded-xl shadow-sm p-6 text-gray-500'>\
                Select at least one month to see the summary.</div>"
            .to_string();
    }

    let summaries = workbook.monthly_summaries(&selection.months, &selection.distances);
    let kpis = budgetweb_core::summary_kpis(&summaries);

    let avg_per_km = kpis
        .average_per_km
        .map(|v| format_money(v, symbol, places))
        .unwrap_or_else(|| "N/A".to_string());
    let max_month = kpis
        .max_expense_month
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut table_rows = String::new();
    for summary in &summaries {
        let distance = summary
            .distance_km
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let per_km = summary
            .per_km_expense
            .map(|v| format_money(v, symbol, places))
            .unwrap_or_else(|| "N/A".to_string());
        table_rows.push_str(&format!(
            "<tr class='border-b'><td class='py-2 px-3'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td>\
             <td class='py-2 px-3 text-right'>{}</td></tr>",
            summary.month,
            format_money(summary.total_expense, symbol, places),
            distance,
            per_km
        ));
    }

    let chart_data = serde_json::to_string(&summaries).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Months Selected</p><p class='text-2xl font-bold text-indigo-700'>{}</p></div>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Total Expense</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Avg Per-KM Expense</p><p class='text-2xl font-bold text-blue-700'>{}</p></div>
            <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Max Expense Month</p><p class='text-2xl font-bold text-yellow-700'>{}</p></div>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Monthly Total Expense</h3>
                <canvas id='chart-expense'></canvas>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Per-KM Expense Trend</h3>
                <canvas id='chart-per-km'></canvas>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Summary Table</h3>
            <table class='w-full text-sm'>
                <thead><tr class='border-b text-left text-gray-500'>
                    <th class='py-2 px-3'>Expense Month</th>
                    <th class='py-2 px-3 text-right'>Total Expense</th>
                    <th class='py-2 px-3 text-right'>Bus KM</th>
                    <th class='py-2 px-3 text-right'>Per KM Expense</th>
                </tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
        <script>
        (function() {{
            const summaries = {};
            const labels = summaries.map(s => s.month);
            new Chart(document.getElementById('chart-expense'), {{
                type: 'bar',
                data: {{
                    labels: labels,
                    datasets: [{{
                        label: 'Total Expense',
                        data: summaries.map(s => Number(s.total_expense)),
                        backgroundColor: '#36A2EB'
                    }}]
                }},
                options: {{ plugins: {{ legend: {{ display: {} }} }} }}
            }});
            new Chart(document.getElementById('chart-per-km'), {{
                type: 'line',
                data: {{
                    labels: labels,
                    datasets: [{{
                        label: 'Per KM Expense',
                        data: summaries.map(s => s.per_km_expense === null ? null : Number(s.per_km_expense)),
                        borderColor: '#FF6384',
                        spanGaps: false
                    }}]
                }},
                options: {{ plugins: {{ legend: {{ display: {} }} }} }}
            }});
        }})();
        </script>"#,
        kpis.months_selected,
        format_money(kpis.total_expense, symbol, places),
        avg_per_km,
        max_month,
        table_rows,
        chart_data,
        config.charts.show_legend,
        config.charts.show_legend
    )
}
