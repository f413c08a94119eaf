use crate::pivot::{PivotMatrix, PivotRow};
use std::collections::{BTreeMap, BTreeSet};

/// A merged display table before formatting: the stacked rows of its source
/// matrices against the union of their column sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTable {
    pub rows: Vec<PivotRow>,
    pub columns: Vec<String>,
}

/// Concatenates source matrices into one table.
///
/// Rows are stacked in source order, matrix by matrix, keeping each matrix's
/// own row order; they are never re-sorted. The column list is the sorted,
/// de-duplicated union of every contributor's own column list, computed
/// independently of the stacking. Cells a source matrix never had are
/// zero-filled against the union. An empty contributor adds no rows and no
/// columns. Variance series ride along unchanged.
pub fn merge_matrices(sources: &[&PivotMatrix]) -> MergedTable {
    let mut union: BTreeSet<&str> = BTreeSet::new();
    for matrix in sources {
        for column in &matrix.columns {
            union.insert(column.as_str());
        }
    }
    let columns: Vec<String> = union.into_iter().map(String::from).collect();

    let mut rows = Vec::new();
    for matrix in sources {
        for row in &matrix.rows {
            let cells: BTreeMap<String, f64> = columns
                .iter()
                .map(|month| {
                    let value = row.cells.get(month).copied().unwrap_or(0.0);
                    (month.clone(), value)
                })
                .collect();
            rows.push(PivotRow {
                label: row.label.clone(),
                cells,
                variance: row.variance.clone(),
            });
        }
    }

    MergedTable { rows, columns }
}
