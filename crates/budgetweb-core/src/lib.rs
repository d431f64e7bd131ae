//! Core expense pipeline and business logic
//!
//! The pipeline is a pure transformation of the current sheet snapshot:
//! raw rows are normalized (total, never drops), allocated into monthly
//! expenses (explicit filter, counted drops), then aggregated per month
//! and per item under a caller-supplied month selection and distance
//! inputs. The [`Workbook`] owns the snapshot; every query method
//! recomputes from it, so identical inputs give identical outputs.

pub mod error;
pub mod models;
pub mod reports;
pub mod types;

use budgetweb_config::Config;
use budgetweb_parser::{ParserRef, Sheet};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{
    allocate, normalize_row, parse_amount, parse_sheet_date, AllocatedRow, NormalizedRow,
};
pub use reports::{
    average_per_distance, filter_rows, item_breakdown, monthly_summaries, per_distance_expense,
    summary_kpis, ItemBreakdown, MonthlySummary, SummaryKpis, WorkbookStats,
};
pub use types::{DurationKind, MonthKey};

/// In-memory pipeline output for the current sheet
#[derive(Debug, Default)]
struct WorkbookData {
    source_rows: usize,
    normalized: Vec<NormalizedRow>,
    allocated: Vec<AllocatedRow>,
    dropped_unallocable: usize,
    dropped_missing_month: usize,
    loaded: bool,
}

/// The loaded purchase sheet and its derived pipeline state
pub struct Workbook {
    config: Config,
    parser: ParserRef,
    data: RwLock<WorkbookData>,
    entry: Option<PathBuf>,
}

impl Workbook {
    /// Create an empty workbook with config and parser
    pub fn new(config: Config, parser: ParserRef) -> Self {
        Self {
            config,
            parser,
            data: RwLock::new(WorkbookData::default()),
            entry: None,
        }
    }

    /// The configuration this workbook was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Loading ====================

    /// Load a purchase sheet from a file path
    pub async fn load(&mut self, path: PathBuf) -> CoreResult<WorkbookStats> {
        let sheet = self.parser.parse_file(path.clone()).await?;
        self.entry = Some(path);
        Ok(self.install(sheet))
    }

    /// Load a purchase sheet from uploaded content.
    ///
    /// On error (e.g. missing required columns) the previous snapshot is
    /// left untouched.
    pub async fn load_content(&mut self, content: &str) -> CoreResult<WorkbookStats> {
        let sheet = self.parser.parse(content).await?;
        Ok(self.install(sheet))
    }

    /// Re-read the sheet this workbook was loaded from
    pub async fn reload(&mut self) -> CoreResult<WorkbookStats> {
        match self.entry.clone() {
            Some(path) if path.exists() => self.load(path).await,
            _ => Err(CoreError::NotLoaded),
        }
    }

    /// Run the normalize/allocate stages and swap in the new snapshot
    fn install(&self, sheet: Sheet) -> WorkbookStats {
        let normalized: Vec<NormalizedRow> = sheet.rows.iter().map(normalize_row).collect();

        let mut allocated = Vec::new();
        let mut dropped_unallocable = 0;
        let mut dropped_missing_month = 0;

        for row in &normalized {
            let (Some(total_value), Some(monthly_expense)) = (row.total_value, allocate(row))
            else {
                dropped_unallocable += 1;
                continue;
            };
            let Some(expense_month) = row.expense_month else {
                dropped_missing_month += 1;
                continue;
            };
            allocated.push(AllocatedRow {
                expense_month,
                item_name: row.item_name.clone(),
                duration: row.duration,
                total_value,
                monthly_expense,
            });
        }

        log::debug!(
            "Sheet installed: {} rows, {} allocable, {} unallocable, {} without month",
            normalized.len(),
            allocated.len(),
            dropped_unallocable,
            dropped_missing_month
        );

        let mut data = self.data.write().unwrap();
        *data = WorkbookData {
            source_rows: sheet.rows.len(),
            normalized,
            allocated,
            dropped_unallocable,
            dropped_missing_month,
            loaded: true,
        };
        Self::stats_of(&data)
    }

    // ==================== Queries ====================

    /// Pipeline accounting for the current snapshot
    pub fn stats(&self) -> WorkbookStats {
        let data = self.data.read().unwrap();
        Self::stats_of(&data)
    }

    fn stats_of(data: &WorkbookData) -> WorkbookStats {
        WorkbookStats {
            loaded: data.loaded,
            source_rows: data.source_rows,
            allocated_rows: data.allocated.len(),
            dropped_unallocable: data.dropped_unallocable,
            dropped_missing_month: data.dropped_missing_month,
        }
    }

    /// Distinct expense months present in the allocable rows, sorted
    pub fn available_months(&self) -> Vec<MonthKey> {
        let data = self.data.read().unwrap();
        let mut months: Vec<MonthKey> = data.allocated.iter().map(|r| r.expense_month).collect();
        months.sort();
        months.dedup();
        months
    }

    /// Per-month summaries for a month selection and distance inputs
    pub fn monthly_summaries(
        &self,
        months: &[MonthKey],
        distances: &HashMap<MonthKey, Decimal>,
    ) -> Vec<MonthlySummary> {
        let data = self.data.read().unwrap();
        monthly_summaries(&data.allocated, months, distances)
    }

    /// Per-item expense ranking over the selected months
    pub fn item_breakdown(&self, months: &[MonthKey]) -> Vec<ItemBreakdown> {
        let data = self.data.read().unwrap();
        item_breakdown(&data.allocated, months)
    }

    /// Allocated rows falling in the selected months, in sheet order
    pub fn filtered_rows(&self, months: &[MonthKey]) -> Vec<AllocatedRow> {
        let data = self.data.read().unwrap();
        filter_rows(&data.allocated, months)
    }

    /// Headline figures for a month selection and distance inputs
    pub fn kpis(
        &self,
        months: &[MonthKey],
        distances: &HashMap<MonthKey, Decimal>,
    ) -> SummaryKpis {
        summary_kpis(&self.monthly_summaries(months, distances))
    }

    /// All normalized rows, including ones excluded from aggregation
    pub fn normalized_rows(&self) -> Vec<NormalizedRow> {
        let data = self.data.read().unwrap();
        data.normalized.clone()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use budgetweb_parser::DefaultSheetParser;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const SHEET: &str = "\
Short Text,Total Value,DURATION,Release Date,Delivery Date
Drill,100,MONTHLY,05/01/2024,
Wrench,\"1,200.50\",MONTHLY,20/01/2024,
License,1200,YEARLY,,15/02/2024
Crane,9000,ONE-TIME,10/02/2024,
Ghost,50,MONTHLY,pending,unknown
Scrap,abc,MONTHLY,05/01/2024,";

    async fn loaded_workbook() -> Workbook {
        let mut wb = Workbook::new(Config::default(), Arc::new(DefaultSheetParser::default()));
        wb.load_content(SHEET).await.unwrap();
        wb
    }

    #[tokio::test]
    async fn test_load_counts_drops_per_cause() {
        let wb = loaded_workbook().await;
        let stats = wb.stats();

        assert!(stats.loaded);
        assert_eq!(stats.source_rows, 6);
        // Crane (ONE-TIME) and Scrap (bad value) are unallocable;
        // Ghost has no parseable date on either side.
        assert_eq!(stats.allocated_rows, 3);
        assert_eq!(stats.dropped_unallocable, 2);
        assert_eq!(stats.dropped_missing_month, 1);
        assert_eq!(stats.dropped_rows(), 3);
    }

    #[tokio::test]
    async fn test_available_months_sorted_distinct() {
        let wb = loaded_workbook().await;
        let labels: Vec<String> = wb
            .available_months()
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(labels, vec!["2024-01", "2024-02"]);
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end() {
        let wb = loaded_workbook().await;
        let months: Vec<MonthKey> =
            vec!["2024-01".parse().unwrap(), "2024-02".parse().unwrap()];
        let mut distances = HashMap::new();
        distances.insert("2024-01".parse().unwrap(), dec!(100));

        let summaries = wb.monthly_summaries(&months, &distances);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_expense, dec!(1300.50));
        assert_eq!(summaries[0].per_km_expense, Some(dec!(13.005)));
        // License: 1200 yearly -> 100 per month, attributed via delivery date
        assert_eq!(summaries[1].total_expense, dec!(100));
        assert_eq!(summaries[1].per_km_expense, None);
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let wb = loaded_workbook().await;
        let months: Vec<MonthKey> = vec!["2024-01".parse().unwrap()];
        let distances = HashMap::new();

        let first = wb.monthly_summaries(&months, &distances);
        let second = wb.monthly_summaries(&months, &distances);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_snapshot() {
        let mut wb = loaded_workbook().await;
        let err = wb.load_content("Wrong,Columns\n1,2").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingColumns);

        // Snapshot from the first load is still served
        assert_eq!(wb.stats().allocated_rows, 3);
    }

    #[tokio::test]
    async fn test_reload_without_entry_is_not_loaded() {
        let mut wb = Workbook::new(Config::default(), Arc::new(DefaultSheetParser::default()));
        let err = wb.reload().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotLoaded);
    }

    #[tokio::test]
    async fn test_empty_workbook_serves_empty_outputs() {
        let wb = Workbook::new(Config::default(), Arc::new(DefaultSheetParser::default()));
        assert!(!wb.stats().loaded);
        assert!(wb.available_months().is_empty());
        assert!(wb
            .monthly_summaries(&["2024-01".parse().unwrap()], &HashMap::new())
            .iter()
            .all(|s| s.total_expense == Decimal::ZERO));
    }
}
