//! Sales totals and sold/unsold counts for a month.

use serde::{Serialize, Serializer};

use crate::{
    Error,
    month::Month,
    store::{TransactionQuery, TransactionStore},
};

/// The sales statistics for a month.
///
/// Every field is zero for a month without transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyStatistics {
    /// The sum of the prices of the sold items.
    ///
    /// Whole totals are written as JSON integers, e.g. `1349` rather than `1349.0`.
    #[serde(serialize_with = "serialize_total")]
    pub total_sales: f64,
    /// The number of sold items.
    pub sold_items: u64,
    /// The number of items that did not sell.
    pub unsold_items: u64,
}

/// Largest magnitude at which every integer is exactly representable as an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn serialize_total<S: Serializer>(total: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if total.fract() == 0.0 && total.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*total as i64)
    } else {
        serializer.serialize_f64(*total)
    }
}

/// The statistics for a month as returned by the API, tagged with the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// The month the statistics are for.
    pub month: Month,
    /// The statistics.
    #[serde(flatten)]
    pub statistics: MonthlyStatistics,
}

/// Calculate the sales statistics for `month`.
///
/// The total, the sold count and the unsold count are independent store calls.
///
/// # Errors
/// Returns an [Error::StoreError] if any of the store calls fail.
pub fn get_monthly_statistics(
    month: Month,
    store: &dyn TransactionStore,
) -> Result<MonthlyStatistics, Error> {
    let sold = TransactionQuery::sold_in(month);

    let total_sales = store.total_price(&sold)?;
    let sold_items = store.count(&sold)?;
    let unsold_items = store.count(&TransactionQuery::unsold_in(month))?;

    Ok(MonthlyStatistics {
        total_sales,
        sold_items,
        unsold_items,
    })
}
