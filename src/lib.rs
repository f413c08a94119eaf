//! # Billing Reconciliation
//!
//! A library that builds the periodic financial-reconciliation report for an
//! enterprise account's billing cycles: ledger line items are classified by
//! nature (debit/credit) and recurrence pattern, aggregated into monthly
//! totals, pivoted into dense month-by-label matrices, enriched with a
//! month-over-month variance series for the recurring-debit values, and
//! merged into four formatted display tables.
//!
//! ## Core Concepts
//!
//! - **Anchor date**: the user-selected due date that pins the six-month
//!   lookback window and the day-of-month filter (one cycle per month).
//! - **Category**: one of six (nature × recurrence) dataset classes, each
//!   computed for a Value and a Quantity metric, twelve datasets in all.
//! - **Pivot matrix**: a dense table of item-type label × month with
//!   zero-filled gaps; empty categories stay empty and merge to nothing.
//! - **Report tables**: recurring, non-recurring and other values (debit
//!   stacked over credit), plus one table merging all six quantity datasets.
//!
//! ## Example
//!
//! ```rust,ignore
//! use billing_reconciliation::*;
//! use chrono::NaiveDate;
//!
//! let ledger = InMemoryLedger::new(vec![BillingLineItem {
//!     item_type: FORECAST_ITEM_TYPE.to_string(),
//!     nature: Nature::Debit,
//!     is_statement: false,
//!     event_recurrence: EventRecurrence::Recurring,
//!     due_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//!     amount: 100.0,
//! }]);
//!
//! let params = ReportParams {
//!     due_date: NaiveDate::from_ymd_opt(2024, 6, 15),
//!     ..Default::default()
//! };
//!
//! let report = build_analysis_report(&ledger, &params);
//! println!("{}", report.to_json().unwrap());
//! ```

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod format;
pub mod merge;
pub mod pivot;
pub mod retrieval;
pub mod schema;
pub mod utils;
pub mod variance;

pub use aggregator::aggregate_monthly;
pub use classifier::ReportWindow;
pub use error::{ReconciliationError, Result};
pub use format::{format_amount, format_percent, render_table};
pub use merge::{merge_matrices, MergedTable};
pub use pivot::{PivotMatrix, PivotRow};
pub use retrieval::{fetch_or_empty, DatasetQuery, InMemoryLedger, LedgerSource};
pub use schema::*;
pub use utils::*;
pub use variance::attach_month_over_month;

use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::collections::BTreeMap;

/// Summed amounts keyed by `(item_type, month_key)`, the output of the
/// monthly aggregation stage.
pub type MonthlyTotals = BTreeMap<(String, String), f64>;

pub struct ReconciliationProcessor;

impl ReconciliationProcessor {
    /// Builds the full analysis report for one request.
    ///
    /// Never fails: a missing anchor date falls back to the current date,
    /// failed retrievals degrade their dataset to empty, and empty categories
    /// contribute nothing to their table. The worst outcome is a report whose
    /// four tables are empty.
    pub fn process(source: &dyn LedgerSource, params: &ReportParams) -> AnalysisReport {
        let anchor = params.due_date.unwrap_or_else(today);
        let window = ReportWindow::around(anchor);

        info!(
            "Building reconciliation report anchored at {} (window {} to {})",
            anchor, window.start, window.end
        );

        let mut matrices: BTreeMap<(Category, MetricKind), PivotMatrix> = BTreeMap::new();

        for category in Category::ALL {
            for metric in MetricKind::ALL {
                let query = DatasetQuery {
                    category,
                    metric,
                    window,
                };

                let records = fetch_or_empty(source, &query);
                let eligible: Vec<&BillingLineItem> = records
                    .iter()
                    .filter(|item| window.admits(item, category))
                    .collect();
                let totals = aggregate_monthly(eligible);
                let mut matrix = PivotMatrix::from_totals(&totals);

                // Only the recurring-debit value block keeps its original
                // labels; every other dataset swaps the forecast sentinel for
                // the display label.
                let is_recurring_debit_value =
                    category == Category::RecurringDebit && metric == MetricKind::Value;
                if !is_recurring_debit_value {
                    matrix.relabel(FORECAST_ITEM_TYPE, RECURRING_CREDIT_LABEL);
                }
                if is_recurring_debit_value {
                    attach_month_over_month(&mut matrix);
                }

                debug!(
                    "Dataset {} aggregated: {} rows over {} months",
                    query.dataset_tag(),
                    matrix.rows.len(),
                    matrix.columns.len()
                );

                matrices.insert((category, metric), matrix);
            }
        }

        let value = |category: Category| &matrices[&(category, MetricKind::Value)];
        let quantity = |category: Category| &matrices[&(category, MetricKind::Quantity)];

        let recurring = render_table(&merge_matrices(&[
            value(Category::RecurringDebit),
            value(Category::RecurringCredit),
        ]));
        let non_recurring = render_table(&merge_matrices(&[
            value(Category::NonRecurringDebit),
            value(Category::NonRecurringCredit),
        ]));
        let other = render_table(&merge_matrices(&[
            value(Category::OtherDebit),
            value(Category::OtherCredit),
        ]));

        let quantity_sources: Vec<&PivotMatrix> =
            Category::ALL.iter().map(|c| quantity(*c)).collect();
        let quantities = render_table(&merge_matrices(&quantity_sources));

        AnalysisReport {
            recurring,
            non_recurring,
            other,
            quantities,
            filters: params.clone(),
        }
    }
}

/// Convenience wrapper around [`ReconciliationProcessor::process`].
pub fn build_analysis_report(source: &dyn LedgerSource, params: &ReportParams) -> AnalysisReport {
    ReconciliationProcessor::process(source, params)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(
        nature: Nature,
        recurrence: EventRecurrence,
        due: NaiveDate,
        amount: f64,
    ) -> BillingLineItem {
        BillingLineItem {
            item_type: FORECAST_ITEM_TYPE.to_string(),
            nature,
            is_statement: false,
            event_recurrence: recurrence,
            due_date: due,
            amount,
        }
    }

    fn params_for(due: NaiveDate) -> ReportParams {
        ReportParams {
            cycle_number: Some(42),
            due_date: Some(due),
            cycle_name: Some("CICLO MENSAL".to_string()),
            cycle_type: Some("REGULAR".to_string()),
        }
    }

    #[test]
    fn test_end_to_end_recurring_debit_variance() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ledger = InMemoryLedger::new(vec![
            line(Nature::Debit, EventRecurrence::Recurring, anchor, 100.0),
            line(
                Nature::Debit,
                EventRecurrence::Recurring,
                NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
                80.0,
            ),
        ]);

        let report = build_analysis_report(&ledger, &params_for(anchor));

        assert_eq!(report.recurring.columns, vec!["2024-05", "2024-06"]);
        assert_eq!(report.recurring.rows.len(), 1);

        let row = &report.recurring.rows[0];
        assert_eq!(row.label, FORECAST_ITEM_TYPE);
        assert_eq!(row.cells["2024-05"], "80.00");
        assert_eq!(row.cells["2024-06"], "100.00");

        let variance = row.variance.as_ref().unwrap();
        assert_eq!(variance["2024-05"], "nan");
        assert_eq!(variance["2024-06"], "25.00%");
    }

    #[test]
    fn test_relabel_everywhere_except_recurring_debit_value() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ledger = InMemoryLedger::new(vec![
            line(Nature::Debit, EventRecurrence::Recurring, anchor, 100.0),
            line(Nature::Credit, EventRecurrence::Recurring, anchor, 40.0),
            line(Nature::Debit, EventRecurrence::NonRecurring, anchor, 10.0),
        ]);

        let report = build_analysis_report(&ledger, &params_for(anchor));

        // Value table 1: the debit row keeps the sentinel, the credit row is
        // relabeled.
        let labels: Vec<&str> = report
            .recurring
            .rows
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec![FORECAST_ITEM_TYPE, RECURRING_CREDIT_LABEL]);

        // Value table 2 and the quantity datasets are all relabeled, the
        // recurring-debit quantity row included.
        assert_eq!(report.non_recurring.rows[0].label, RECURRING_CREDIT_LABEL);
        for row in &report.quantities.rows {
            assert_eq!(row.label, RECURRING_CREDIT_LABEL);
        }
    }

    #[test]
    fn test_quantity_table_merges_all_six_categories() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let may = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let ledger = InMemoryLedger::new(vec![
            line(Nature::Debit, EventRecurrence::Recurring, anchor, 1.0),
            line(Nature::Credit, EventRecurrence::Recurring, anchor, 2.0),
            line(Nature::Debit, EventRecurrence::NonRecurring, may, 3.0),
            line(Nature::Credit, EventRecurrence::NonRecurring, anchor, 4.0),
            line(Nature::Debit, EventRecurrence::Other, may, 5.0),
            line(Nature::Credit, EventRecurrence::Other, anchor, 6.0),
        ]);

        let report = build_analysis_report(&ledger, &params_for(anchor));

        // One row per category, stacked in the fixed category order, against
        // the union of both months.
        assert_eq!(report.quantities.rows.len(), 6);
        assert_eq!(report.quantities.columns, vec!["2024-05", "2024-06"]);

        let first = &report.quantities.rows[0];
        assert_eq!(first.cells["2024-06"], "1.00");
        assert_eq!(first.cells["2024-05"], "0.00");

        let third = &report.quantities.rows[2];
        assert_eq!(third.cells["2024-05"], "3.00");
        assert_eq!(third.cells["2024-06"], "0.00");
    }

    #[test]
    fn test_empty_ledger_yields_empty_tables() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ledger = InMemoryLedger::default();

        let report = build_analysis_report(&ledger, &params_for(anchor));

        for table in [
            &report.recurring,
            &report.non_recurring,
            &report.other,
            &report.quantities,
        ] {
            assert!(table.rows.is_empty());
            assert!(table.columns.is_empty());
        }
    }

    #[test]
    fn test_filters_echoed_back() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ledger = InMemoryLedger::default();

        let report = build_analysis_report(&ledger, &params_for(anchor));

        assert_eq!(report.filters.cycle_number, Some(42));
        assert_eq!(report.filters.due_date, Some(anchor));
        assert_eq!(report.filters.cycle_name.as_deref(), Some("CICLO MENSAL"));
        assert_eq!(report.filters.cycle_type.as_deref(), Some("REGULAR"));
    }

    #[test]
    fn test_missing_anchor_falls_back_to_today() {
        let ledger = InMemoryLedger::default();
        let report = build_analysis_report(&ledger, &ReportParams::default());

        assert!(report.filters.due_date.is_none());
        assert!(report.recurring.rows.is_empty());
    }
}
