use crate::MonthlyTotals;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One pivot row: an item-type label, a dense month-keyed cell map, and the
/// month-over-month variance series on rows that carry one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotRow {
    pub label: String,
    pub cells: BTreeMap<String, f64>,
    pub variance: Option<BTreeMap<String, f64>>,
}

/// A dense month-by-label matrix for one (category, metric) dataset.
///
/// Columns are the sorted distinct month keys of the source totals; rows are
/// the distinct labels in ascending order. Every row holds a cell for every
/// column of its own matrix, zero-filled where the source had no total. An
/// empty source produces zero rows and an empty column list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PivotMatrix {
    pub rows: Vec<PivotRow>,
    pub columns: Vec<String>,
}

impl PivotMatrix {
    pub fn from_totals(totals: &MonthlyTotals) -> Self {
        let mut labels: BTreeSet<&str> = BTreeSet::new();
        let mut columns: BTreeSet<&str> = BTreeSet::new();
        for (label, month) in totals.keys() {
            labels.insert(label.as_str());
            columns.insert(month.as_str());
        }

        let columns: Vec<String> = columns.into_iter().map(String::from).collect();
        let rows = labels
            .into_iter()
            .map(|label| {
                let cells: BTreeMap<String, f64> = columns
                    .iter()
                    .map(|month| {
                        let total = totals
                            .get(&(label.to_string(), month.clone()))
                            .copied()
                            .unwrap_or(0.0);
                        (month.clone(), total)
                    })
                    .collect();
                PivotRow {
                    label: label.to_string(),
                    cells,
                    variance: None,
                }
            })
            .collect();

        PivotMatrix { rows, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Swaps one row label for another, leaving row order untouched. Applied
    /// with the forecast sentinel and the recurring-credit display label to
    /// every dataset matrix except the recurring-debit value matrix.
    pub fn relabel(&mut self, from: &str, to: &str) {
        for row in &mut self.rows {
            if row.label == from {
                row.label = to.to_string();
            }
        }
    }
}
