//! Report structures and the aggregation / per-distance metric functions
//!
//! Everything here is a pure function of (allocated rows, selection
//! parameters); identical inputs produce identical outputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::AllocatedRow;
use super::types::MonthKey;

/// Per-month summary for the selected months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Expense month
    pub month: MonthKey,
    /// Sum of monthly expenses attributed to this month
    pub total_expense: Decimal,
    /// User-supplied distance for this month, if any
    pub distance_km: Option<Decimal>,
    /// total_expense / distance_km; None unless the distance is strictly
    /// positive
    pub per_km_expense: Option<Decimal>,
}

/// Summed expense per item over the filtered set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBreakdown {
    /// Item name (`Short Text`)
    pub item_name: String,
    /// Summed monthly expense
    pub total_expense: Decimal,
}

/// Headline figures across the selected months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryKpis {
    /// Number of months selected
    pub months_selected: usize,
    /// Total expense across all selected months
    pub total_expense: Decimal,
    /// Mean of the per-km figures that could be computed; None when no
    /// month has a usable distance
    pub average_per_km: Option<Decimal>,
    /// Month with the highest total expense
    pub max_expense_month: Option<MonthKey>,
}

/// Pipeline accounting for the loaded sheet
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WorkbookStats {
    /// Whether a sheet has been loaded
    pub loaded: bool,
    /// Data rows in the source sheet
    pub source_rows: usize,
    /// Rows that survived allocation
    pub allocated_rows: usize,
    /// Rows dropped because the duration or value made them unallocable
    pub dropped_unallocable: usize,
    /// Allocable rows dropped because neither date yielded a month
    pub dropped_missing_month: usize,
}

impl WorkbookStats {
    /// Total rows excluded from aggregation
    pub fn dropped_rows(&self) -> usize {
        self.dropped_unallocable + self.dropped_missing_month
    }
}

/// Deduplicate and chronologically sort a month selection
fn normalize_selection(months: &[MonthKey]) -> Vec<MonthKey> {
    let mut selection = months.to_vec();
    selection.sort();
    selection.dedup();
    selection
}

/// Rows whose expense month is in the selection, in original order
pub fn filter_rows(rows: &[AllocatedRow], months: &[MonthKey]) -> Vec<AllocatedRow> {
    rows.iter()
        .filter(|r| months.contains(&r.expense_month))
        .cloned()
        .collect()
}

/// Group the filtered rows by expense month and join the distance inputs.
///
/// Every selected month appears in the result, chronologically ordered;
/// a month with no matching rows is reported with a total of zero rather
/// than omitted, so its distance input still has a row to join against.
pub fn monthly_summaries(
    rows: &[AllocatedRow],
    months: &[MonthKey],
    distances: &HashMap<MonthKey, Decimal>,
) -> Vec<MonthlySummary> {
    let selection = normalize_selection(months);

    let mut totals: HashMap<MonthKey, Decimal> = HashMap::new();
    for row in rows {
        if selection.contains(&row.expense_month) {
            *totals.entry(row.expense_month).or_insert(Decimal::ZERO) += row.monthly_expense;
        }
    }

    selection
        .into_iter()
        .map(|month| {
            let total_expense = totals.get(&month).copied().unwrap_or(Decimal::ZERO);
            let distance_km = distances.get(&month).copied();
            MonthlySummary {
                month,
                total_expense,
                distance_km,
                per_km_expense: per_distance_expense(total_expense, distance_km),
            }
        })
        .collect()
}

/// Group the filtered rows by item name, summing monthly expenses.
///
/// Ranked descending by sum; ties keep first-encounter row order (the
/// sort is stable and items are accumulated in row order).
pub fn item_breakdown(rows: &[AllocatedRow], months: &[MonthKey]) -> Vec<ItemBreakdown> {
    let selection = normalize_selection(months);

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut items: Vec<ItemBreakdown> = Vec::new();

    for row in rows {
        if !selection.contains(&row.expense_month) {
            continue;
        }
        match order.get(&row.item_name) {
            Some(&i) => items[i].total_expense += row.monthly_expense,
            None => {
                order.insert(row.item_name.clone(), items.len());
                items.push(ItemBreakdown {
                    item_name: row.item_name.clone(),
                    total_expense: row.monthly_expense,
                });
            }
        }
    }

    items.sort_by(|a, b| b.total_expense.cmp(&a.total_expense));
    items
}

/// Expense per distance unit for one month.
///
/// Defined only for strictly positive distances; zero, negative, or
/// absent distances yield None. Division errors cannot occur.
pub fn per_distance_expense(total_expense: Decimal, distance: Option<Decimal>) -> Option<Decimal> {
    match distance {
        Some(d) if d > Decimal::ZERO => Some(total_expense / d),
        _ => None,
    }
}

/// Mean of the per-km figures that are defined; None when all are absent
pub fn average_per_distance(summaries: &[MonthlySummary]) -> Option<Decimal> {
    let defined: Vec<Decimal> = summaries.iter().filter_map(|s| s.per_km_expense).collect();
    if defined.is_empty() {
        return None;
    }
    let sum: Decimal = defined.iter().sum();
    Some(sum / Decimal::from(defined.len() as i64))
}

/// Headline figures for the summary table
pub fn summary_kpis(summaries: &[MonthlySummary]) -> SummaryKpis {
    SummaryKpis {
        months_selected: summaries.len(),
        total_expense: summaries.iter().map(|s| s.total_expense).sum(),
        average_per_km: average_per_distance(summaries),
        max_expense_month: summaries
            .iter()
            .max_by(|a, b| a.total_expense.cmp(&b.total_expense))
            .map(|s| s.month),
    }
}
