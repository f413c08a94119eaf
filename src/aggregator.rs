use crate::schema::BillingLineItem;
use crate::utils::month_key;
use crate::MonthlyTotals;

/// Groups eligible line items by `(item_type, month_key)` and sums the
/// amount field. An empty input yields an empty mapping, which downstream
/// stages treat as "no data" rather than an error.
pub fn aggregate_monthly<'a, I>(items: I) -> MonthlyTotals
where
    I: IntoIterator<Item = &'a BillingLineItem>,
{
    let mut totals = MonthlyTotals::new();

    for item in items {
        let key = (item.item_type.clone(), month_key(item.due_date));
        *totals.entry(key).or_insert(0.0) += item.amount;
    }

    totals
}
