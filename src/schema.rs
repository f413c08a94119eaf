use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item-type label carried by forecast ledger rows. The report only ever
/// selects rows bearing this sentinel.
pub const FORECAST_ITEM_TYPE: &str = "PREVIA";

/// Display label substituted for the sentinel item type in every dataset
/// except the recurring-debit value matrix.
pub const RECURRING_CREDIT_LABEL: &str = "CREDITO RECORRENTE";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Nature {
    #[schemars(description = "A charge against the account (ledger debit)")]
    Debit,

    #[schemars(description = "An amount in the account's favour (ledger credit)")]
    Credit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum EventRecurrence {
    #[schemars(description = "Repeats every billing cycle (subscriptions, fixed fees)")]
    Recurring,

    #[schemars(description = "One-off charge or credit tied to a single cycle")]
    NonRecurring,

    #[schemars(description = "Adjustments and anything outside the recurring/non-recurring split")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillingLineItem {
    #[schemars(
        description = "Item-type label as stored on the ledger row. Forecast rows carry the sentinel 'PREVIA'; only those are eligible for this report."
    )]
    pub item_type: String,

    #[schemars(description = "Whether the line is a debit or a credit")]
    pub nature: Nature,

    #[schemars(
        description = "True when the row belongs to a statement run. Statement rows are never eligible for the reconciliation report."
    )]
    pub is_statement: bool,

    #[schemars(description = "Recurrence classification of the originating event")]
    pub event_recurrence: EventRecurrence,

    #[schemars(
        description = "Due date of the billing cycle the line belongs to, YYYY-MM-DD. Drives both the month bucket and the day-of-month anchor filter."
    )]
    pub due_date: NaiveDate,

    #[schemars(
        description = "Line amount in the account currency. All amounts are assumed to share one currency; no conversion is performed."
    )]
    pub amount: f64,
}

impl BillingLineItem {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BillingLineItem)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// The six dataset categories, one per (nature, recurrence) pair.
///
/// `ALL` fixes the order datasets are queried and the order their matrices
/// are stacked into the merged tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Category {
    RecurringDebit,
    RecurringCredit,
    NonRecurringDebit,
    NonRecurringCredit,
    OtherDebit,
    OtherCredit,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::RecurringDebit,
        Category::RecurringCredit,
        Category::NonRecurringDebit,
        Category::NonRecurringCredit,
        Category::OtherDebit,
        Category::OtherCredit,
    ];

    pub fn nature(self) -> Nature {
        match self {
            Category::RecurringDebit | Category::NonRecurringDebit | Category::OtherDebit => {
                Nature::Debit
            }
            Category::RecurringCredit | Category::NonRecurringCredit | Category::OtherCredit => {
                Nature::Credit
            }
        }
    }

    pub fn recurrence(self) -> EventRecurrence {
        match self {
            Category::RecurringDebit | Category::RecurringCredit => EventRecurrence::Recurring,
            Category::NonRecurringDebit | Category::NonRecurringCredit => {
                EventRecurrence::NonRecurring
            }
            Category::OtherDebit | Category::OtherCredit => EventRecurrence::Other,
        }
    }
}

/// The two metrics computed for every category.
///
/// Quantity datasets aggregate the same `sum(amount)` as Value datasets; the
/// production report has always published summed amounts under its quantity
/// heading and this crate preserves that behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum MetricKind {
    Value,
    Quantity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 2] = [MetricKind::Value, MetricKind::Quantity];
}

/// Filter parameters received from the report form, echoed back on the
/// finished report for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReportParams {
    #[schemars(description = "Cycle number of the selected billing run, if one was picked")]
    pub cycle_number: Option<u32>,

    #[schemars(
        description = "Anchor due date pinning the six-month lookback window and the day-of-month filter. When absent the report anchors to the current date."
    )]
    pub due_date: Option<NaiveDate>,

    #[schemars(description = "Display name of the selected cycle")]
    pub cycle_name: Option<String>,

    #[schemars(description = "Cycle type label of the selected cycle")]
    pub cycle_type: Option<String>,
}

/// One row of a rendered report table: the (post-relabel) item-type label,
/// formatted cell strings keyed by month, and the formatted variance series
/// on rows that carry one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub cells: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<BTreeMap<String, String>>,
}

/// A rendered display table: its own sorted, de-duplicated month column list
/// plus the stacked rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    pub fn empty() -> Self {
        ReportTable {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// The finished reconciliation report: four display tables plus the filter
/// parameters echoed back.
///
/// Table layout follows the production report: recurring and non-recurring
/// and other each merge their debit and credit value matrices; the quantities
/// table merges all six quantity matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub recurring: ReportTable,
    pub non_recurring: ReportTable,
    pub other: ReportTable,
    pub quantities: ReportTable,
    pub filters: ReportParams,
}

impl AnalysisReport {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
