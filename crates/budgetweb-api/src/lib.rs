//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::summary: Summary table, KPI tiles, charts
//! - routes::breakdown: Top tools breakdown
//! - routes::rows: Tool detail listing
//! - routes::sheet: Upload, reload, months, pipeline stats
//! - routes::export: CSV report downloads

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use budgetweb_config::Config;
use budgetweb_core::Workbook;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub workbook: Arc<RwLock<Workbook>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::breakdown::{api_breakdown, htmx_breakdown};
    use routes::export::{export_rows_csv, export_summary_csv};
    use routes::rows::{api_rows, htmx_rows};
    use routes::sheet::{api_months, api_reload, api_stats, api_upload_sheet};
    use routes::summary::{api_summary, htmx_summary};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/months", get(api_months))
        .route("/api/summary", get(api_summary))
        .route("/api/breakdown", get(api_breakdown))
        .route("/api/rows", get(api_rows))
        .route("/api/stats", get(api_stats))
        .route("/api/sheet", post(api_upload_sheet))
        .route("/api/reload", post(api_reload))
        // Pages
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        // HTMX partial routes
        .route("/dashboard/content", get(htmx_dashboard_content))
        .route("/summary", get(htmx_summary))
        .route("/breakdown", get(htmx_breakdown))
        .route("/rows", get(htmx_rows))
        // CSV downloads
        .route("/export/summary.csv", get(export_summary_csv))
        .route("/export/rows.csv", get(export_rows_csv))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Budgetweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Page header bar
pub fn page_header() -> String {
    "<header class='bg-white border-b px-6 py-4 flex items-center justify-between'>\
     <h1 class='text-xl font-bold text-indigo-600'>Budgetweb</h1>\
     <span class='text-sm text-gray-500'>Monthly Budget &amp; Tool Expense Dashboard</span>\
     </header>"
        .to_string()
}

// ==================== Dashboard Page ====================

/// Dashboard page: upload card, month/KM controls, content area
async fn page_dashboard(
    state: axum::extract::State<AppState>,
) -> axum::response::Html<String> {
    let workbook = state.workbook.read().await;
    let stats = workbook.stats();
    let months = workbook.available_months();

    let stats_line = if stats.loaded {
        format!(
            "{} rows loaded &middot; {} allocable &middot; {} excluded",
            stats.source_rows,
            stats.allocated_rows,
            stats.dropped_rows()
        )
    } else {
        "No purchase sheet loaded yet.".to_string()
    };

    let mut month_controls = String::new();
    for month in &months {
        month_controls.push_str(&format!(
            "<div class='flex items-center gap-2 p-2 border rounded-lg bg-white'>\
             <label class='flex items-center gap-2 text-sm font-medium'>\
             <input type='checkbox' class='month-check' value='{m}' onchange='applySelection()'> {m}</label>\
             <input type='number' min='0' step='100' placeholder='Bus KM' data-month='{m}' \
             class='km-input w-28 px-2 py-1 text-sm border rounded' onchange='applySelection()' />\
             </div>",
            m = month
        ));
    }
    if months.is_empty() {
        month_controls.push_str(
            "<p class='text-sm text-gray-500'>Upload a sheet to see its expense months.</p>",
        );
    }

    let inner_content = format!(
        r#"<main class='max-w-6xl mx-auto p-6'>
        <div class='grid grid-cols-1 lg:grid-cols-3 gap-6 mb-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-2'>Upload Sheet</h3>
                <p class='text-sm text-gray-500 mb-3'>CSV export with <code>Total Value</code>,
                <code>DURATION</code>, <code>Release Date</code>, <code>Delivery Date</code>,
                <code>Short Text</code> columns.</p>
                <input type='file' id='sheet-file' accept='.csv,text/csv' class='text-sm mb-3' />
                <button onclick='uploadSheet()' class='px-3 py-2 bg-indigo-600 text-white text-sm rounded-lg hover:bg-indigo-700'>Upload</button>
                <p class='text-xs text-gray-400 mt-3'>{}</p>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6 lg:col-span-2'>
                <h3 class='text-lg font-semibold mb-2'>Select Month(s) and Bus KM</h3>
                <div class='flex flex-wrap gap-2'>{}</div>
            </div>
        </div>
        <div id='dashboard-content'>
            <div class='bg-white rounded-xl shadow-sm p-6 text-gray-500'>Select at least one month to see the summary.</div>
        </div>
        </main>
        <script>
        function applySelection() {{
            const months = Array.from(document.querySelectorAll('.month-check:checked')).map(c => c.value);
            let query = 'months=' + encodeURIComponent(months.join(','));
            document.querySelectorAll('.km-input').forEach(input => {{
                if (input.value !== '' && months.includes(input.dataset.month)) {{
                    query += '&km_' + input.dataset.month + '=' + encodeURIComponent(input.value);
                }}
            }});
            htmx.ajax('GET', '/dashboard/content?' + query, {{ target: '#dashboard-content', swap: 'innerHTML' }});
        }}

        function uploadSheet() {{
            const input = document.getElementById('sheet-file');
            if (!input.files.length) {{ return; }}
            const reader = new FileReader();
            reader.onload = () => {{
                fetch('/api/sheet', {{ method: 'POST', body: reader.result }})
                    .then(r => r.ok
                        ? window.location.reload()
                        : r.json().then(e => alert(e.error || 'Upload failed')))
                    .catch(() => alert('Upload failed'));
            }};
            reader.readAsText(input.files[0]);
        }}
        </script>"#,
        stats_line, month_controls
    );

    axum::response::Html(base_html(
        "Dashboard",
        &format!("{}{}", page_header(), inner_content),
    ))
}

/// HTMX: full dashboard content for the current selection
async fn htmx_dashboard_content(
    state: axum::extract::State<AppState>,
    params: axum::extract::Query<std::collections::HashMap<String, String>>,
) -> String {
    let workbook = state.workbook.read().await;
    let selection = routes::selection::parse_selection(&params);

    format!(
        "{}{}{}",
        routes::summary::render_summary_section(&workbook, &selection),
        routes::breakdown::render_breakdown_section(&workbook, &selection),
        routes::rows::render_rows_section(&workbook, &selection)
    )
}

// ==================== Server ====================

/// Start the HTTP server
///
/// Creates the router, binds to the configured address, and serves until
/// the process is stopped.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `workbook` - The shared workbook state
pub async fn start_server(config: Config, workbook: Arc<RwLock<Workbook>>) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { workbook, config };

    let router = create_router(state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Could not bind {}: {}", addr, e);
            return;
        }
    };

    log::info!("Starting Budgetweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /export/summary.csv, /export/rows.csv (Reports)");
    log::info!("  - /api/* (JSON API endpoints)");

    match axum::serve(listener, router).await {
        Ok(_) => log::info!("Server stopped gracefully"),
        Err(e) => log::error!("Server error: {}", e),
    }
}
