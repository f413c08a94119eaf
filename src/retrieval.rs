use crate::classifier::ReportWindow;
use crate::error::Result;
use crate::schema::{BillingLineItem, Category, MetricKind};
use log::warn;

/// One of the twelve parameterized dataset queries a report issues against
/// the ledger: a (category, metric) pair plus the resolved due-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetQuery {
    pub category: Category,
    pub metric: MetricKind,
    pub window: ReportWindow,
}

impl DatasetQuery {
    /// Short dataset tag for logs and retrieval errors, e.g.
    /// `RecurringDebit/Value`.
    pub fn dataset_tag(&self) -> String {
        format!("{:?}/{:?}", self.category, self.metric)
    }
}

/// The external ledger collaborator. Implementations run the query against
/// whatever holds the line items (a database in production, a vector in
/// tests) and return the matching typed records.
///
/// Implementations may over-return; the processor re-applies the eligibility
/// predicate to everything a source hands back.
pub trait LedgerSource {
    fn fetch_line_items(&self, query: &DatasetQuery) -> Result<Vec<BillingLineItem>>;
}

/// Reference `LedgerSource` over an owned record set. Evaluates the query
/// predicate directly, which makes it the fixture of choice for tests and
/// for callers that already hold the full record set in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    items: Vec<BillingLineItem>,
}

impl InMemoryLedger {
    pub fn new(items: Vec<BillingLineItem>) -> Self {
        InMemoryLedger { items }
    }
}

impl LedgerSource for InMemoryLedger {
    fn fetch_line_items(&self, query: &DatasetQuery) -> Result<Vec<BillingLineItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| query.window.admits(item, query.category))
            .cloned()
            .collect())
    }
}

/// Fetches one dataset, substituting an empty record set when the source
/// fails. A failed sub-query degrades its own dataset and never aborts the
/// rest of the report.
pub fn fetch_or_empty(source: &dyn LedgerSource, query: &DatasetQuery) -> Vec<BillingLineItem> {
    match source.fetch_line_items(query) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "Retrieval failed for dataset {}, continuing with empty data: {}",
                query.dataset_tag(),
                err
            );
            Vec::new()
        }
    }
}
