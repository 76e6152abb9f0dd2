//! Sales Report is a small web service for monthly reporting over product-sale
//! transactions.
//!
//! Transactions are loaded from a remote JSON feed into a SQLite database, and
//! the service answers per-month queries: sales statistics, a price-range
//! histogram, a category distribution, and a combined summary of all three.
//!
//! This library provides a REST API that serves JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod ingest;
mod listing;
mod logging;
mod month;
mod pagination;
mod product;
mod report;
mod routing;
mod store;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, ReportConfig};
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use ingest::{DEFAULT_FEED_URL, fetch_feed, initialize_store, parse_feed};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::{Month, MonthQuery};
pub use pagination::{Page, PaginationConfig};
pub use product::ProductTransaction;
pub use report::{
    CategoryDistribution, MonthlyStatistics, PriceBucket, PriceRangeDistribution, SummaryReport,
    build_summary, get_category_distribution, get_monthly_statistics, get_price_range_distribution,
};
pub use routing::build_router;
pub use store::{SQLiteTransactionStore, TransactionQuery, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month selector was missing, not an integer, or outside 1 to 12.
    ///
    /// This error is always raised before the store is queried.
    #[error("Invalid month. Provide a value between 1 and 12.")]
    InvalidMonth,

    /// The query string of a listing request could not be read, e.g. because
    /// a parameter was repeated.
    #[error("Invalid query string. Provide each parameter at most once.")]
    InvalidQuery,

    /// The page size for listing transactions was zero.
    #[error("Invalid limit. Provide a page size of at least 1.")]
    InvalidPageSize,

    /// An unexpected error occurred in the transaction store.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("the transaction store failed: {0}")]
    StoreError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// At least one of the sub-aggregations of a monthly summary failed.
    ///
    /// The failing sub-aggregation is logged where it fails, the summary
    /// itself is never returned partially.
    #[error("could not aggregate the monthly summary")]
    AggregationFailed,

    /// The transaction feed could not be downloaded.
    #[error("could not fetch the transaction feed: {0}")]
    FeedUnavailable(String),

    /// The transaction feed was downloaded but is not a list of transactions.
    #[error("could not parse the transaction feed: {0}")]
    InvalidFeed(String),

    /// The transaction feed was parsed but could not be written to the store.
    #[error("could not store the transaction feed: {0}")]
    IngestFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::StoreError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidMonth | Error::InvalidPageSize | Error::InvalidQuery => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::AggregationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to aggregate the monthly summary.".to_owned(),
            ),
            Error::FeedUnavailable(_) | Error::InvalidFeed(_) | Error::IngestFailed(_) => {
                tracing::error!("Could not initialize the transaction store: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch and store data".to_owned(),
                )
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
