use crate::merge::MergedTable;
use crate::schema::{ReportTable, TableRow};

/// Renders a numeric cell the way the production report always has: two
/// decimal digits, thousands grouped with commas, then every comma replaced
/// by a period. `1234.5` renders as `"1.234.50"`: visually ambiguous but
/// deterministic, and replicated rather than corrected. Not-a-number renders
/// as the literal `"nan"`.
pub fn format_amount(value: f64) -> String {
    grouped_fixed(value).replace(',', ".")
}

/// Variance rendering: the amount format with a trailing `%`. The
/// not-a-number sentinel stays bare `"nan"` with no suffix.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    format!("{}%", format_amount(value))
}

/// Two-decimal rendering with comma thousands groups, e.g. `-1,234.50`.
fn grouped_fixed(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Applies the formatter uniformly to a merged table, producing the final
/// display rows. Cell values get the amount format; variance series get the
/// percent format.
pub fn render_table(table: &MergedTable) -> ReportTable {
    let rows = table
        .rows
        .iter()
        .map(|row| TableRow {
            label: row.label.clone(),
            cells: row
                .cells
                .iter()
                .map(|(month, value)| (month.clone(), format_amount(*value)))
                .collect(),
            variance: row.variance.as_ref().map(|series| {
                series
                    .iter()
                    .map(|(month, value)| (month.clone(), format_percent(*value)))
                    .collect()
            }),
        })
        .collect();

    ReportTable {
        columns: table.columns.clone(),
        rows,
    }
}
