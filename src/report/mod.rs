//! Monthly reports over the product transactions.
//!
//! This module contains:
//! - The aggregations: sales statistics, a price histogram and a category distribution
//! - The summary that runs all three aggregations concurrently
//! - The route handlers that expose each report as JSON

mod categories;
mod handlers;
mod histogram;
mod statistics;
mod summary;

pub use categories::{CategoryDistribution, get_category_distribution};
pub use handlers::{
    get_category_report, get_price_range_report, get_statistics_report, get_summary_report,
};
pub use histogram::{PriceBucket, PriceRangeDistribution, get_price_range_distribution};
pub use statistics::{MonthlyStatistics, get_monthly_statistics};
pub use summary::{SummaryReport, build_summary};

use crate::Error;

/// Run a blocking store task on the blocking thread pool.
///
/// # Errors
/// Returns the task's error, or an [Error::StoreError] if the task panicked.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|error| {
        tracing::error!("a blocking store task did not complete: {error}");
        Error::StoreError(error.to_string())
    })?
}
