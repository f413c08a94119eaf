use crate::schema::{BillingLineItem, Category, FORECAST_ITEM_TYPE};
use crate::utils::lookback_window_start;
use chrono::{Datelike, NaiveDate};

/// The inclusive due-date window a report covers: the anchor month plus the
/// five preceding months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// Builds the window for an anchor due date. The start is the end of the
    /// month before the anchor shifted back five calendar months, so every
    /// cycle due on the anchor's day of month within the last six months
    /// falls inside.
    pub fn around(anchor: NaiveDate) -> Self {
        ReportWindow {
            start: lookback_window_start(anchor),
            end: anchor,
        }
    }

    /// Eligibility predicate for one line item against one category.
    ///
    /// A line qualifies when it is not a statement row, its nature and
    /// recurrence match the category, it carries the forecast item-type
    /// sentinel, its due day equals the anchor's due day, and its due date
    /// lies inside the window. The day-of-month equality selects exactly one
    /// cycle per month, not every cycle in the window.
    pub fn admits(&self, item: &BillingLineItem, category: Category) -> bool {
        !item.is_statement
            && item.nature == category.nature()
            && item.event_recurrence == category.recurrence()
            && item.item_type == FORECAST_ITEM_TYPE
            && item.due_date.day() == self.end.day()
            && item.due_date >= self.start
            && item.due_date <= self.end
    }
}
