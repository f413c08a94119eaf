use crate::pivot::PivotMatrix;
use std::collections::BTreeMap;

/// Attaches the month-over-month percentage change series to every row of a
/// matrix. Runs on the recurring-debit value matrix only; the other eleven
/// datasets never carry variance.
///
/// For column index `i >= 1` the variance is
/// `(cell[i] - cell[i-1]) / cell[i-1] * 100`. The first column has no
/// predecessor and a zero predecessor has no defined change; both yield the
/// `f64::NAN` sentinel instead of a division error.
pub fn attach_month_over_month(matrix: &mut PivotMatrix) {
    let PivotMatrix { rows, columns } = matrix;

    for row in rows.iter_mut() {
        let mut series: BTreeMap<String, f64> = BTreeMap::new();
        let mut prev: Option<f64> = None;

        for month in columns.iter() {
            let current = row.cells.get(month).copied().unwrap_or(0.0);
            let change = match prev {
                Some(p) if p != 0.0 => (current - p) / p * 100.0,
                _ => f64::NAN,
            };
            series.insert(month.clone(), change);
            prev = Some(current);
        }

        row.variance = Some(series);
    }
}
