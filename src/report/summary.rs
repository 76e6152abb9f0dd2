//! Combines the statistics, price histogram and category distribution for a
//! month into a single report.

use std::{sync::Arc, time::Duration};

use serde::Serialize;

use crate::{Error, month::Month, store::TransactionStore};

use super::{
    categories::{CategoryDistribution, get_category_distribution},
    histogram::{PriceRangeDistribution, get_price_range_distribution},
    run_blocking,
    statistics::{StatisticsReport, get_monthly_statistics},
};

/// Every report for a month in one response.
///
/// Each field is identical to the response of the corresponding single report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// The month the summary is for.
    pub month: Month,
    /// The sales statistics.
    pub statistics: StatisticsReport,
    /// The number of sold items per price range.
    pub price_range_distribution: PriceRangeDistribution,
    /// The number of sold items per category.
    pub category_distribution: CategoryDistribution,
}

/// Build the summary for `month` by running the three aggregations concurrently.
///
/// Each aggregation runs on the blocking thread pool and is given `timeout` to
/// finish. The summary is only returned if all three succeed.
///
/// # Errors
/// Returns [Error::AggregationFailed] if any aggregation fails or times out.
/// The results of the other aggregations are discarded.
pub async fn build_summary(
    month: Month,
    store: Arc<dyn TransactionStore>,
    timeout: Duration,
) -> Result<SummaryReport, Error> {
    let statistics = aggregate("statistics", timeout, {
        let store = Arc::clone(&store);
        move || get_monthly_statistics(month, store.as_ref())
    });
    let price_range = aggregate("price range", timeout, {
        let store = Arc::clone(&store);
        move || get_price_range_distribution(month, store.as_ref())
    });
    let categories = aggregate("category", timeout, {
        let store = Arc::clone(&store);
        move || get_category_distribution(month, store.as_ref())
    });

    let (statistics, price_range, categories) = tokio::join!(statistics, price_range, categories);

    Ok(SummaryReport {
        month,
        statistics: StatisticsReport {
            month,
            statistics: statistics?,
        },
        price_range_distribution: price_range?,
        category_distribution: categories?,
    })
}

/// Run one aggregation of a summary, mapping any failure to [Error::AggregationFailed].
async fn aggregate<T, F>(name: &'static str, timeout: Duration, task: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, run_blocking(task)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            tracing::error!("the {name} aggregation failed: {error}");
            Err(Error::AggregationFailed)
        }
        Err(_) => {
            tracing::error!("the {name} aggregation did not finish within {timeout:?}");
            Err(Error::AggregationFailed)
        }
    }
}
