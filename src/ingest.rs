//! Loads the product transactions from the remote JSON feed into the store.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::Serialize;

use crate::{
    AppState, Error, product::ProductTransaction, report::run_blocking, store::TransactionStore,
};

/// Where the transaction feed is published by default.
pub const DEFAULT_FEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Parse the body of the transaction feed, a JSON array of transactions.
///
/// # Errors
/// Returns [Error::InvalidFeed] if `bytes` is not a JSON array of valid transactions.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<ProductTransaction>, Error> {
    serde_json::from_slice(bytes).map_err(|error| Error::InvalidFeed(error.to_string()))
}

/// Download and parse the transaction feed at `url`.
///
/// # Errors
/// This function will return a:
/// - [Error::FeedUnavailable] if the request fails or the server does not respond with a
///   success status,
/// - or [Error::InvalidFeed] if the body is not a list of transactions.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<ProductTransaction>, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| Error::FeedUnavailable(error.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::FeedUnavailable(format!(
            "{url} responded with status {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|error| Error::FeedUnavailable(error.to_string()))?;

    parse_feed(&body)
}

/// Replace the contents of `store` with `transactions`.
///
/// Returns the number of transactions stored.
///
/// # Errors
/// Returns the store's error if the replacement fails, in which case the
/// store keeps its previous contents.
pub fn initialize_store(
    store: &dyn TransactionStore,
    transactions: Vec<ProductTransaction>,
) -> Result<usize, Error> {
    store.replace_all(transactions)
}

/// The state needed for loading the transaction feed.
#[derive(Clone)]
pub struct IngestState {
    /// The store to load the transactions into.
    pub store: Arc<dyn TransactionStore>,
    /// The client to download the feed with.
    pub http_client: reqwest::Client,
    /// The URL of the feed.
    pub feed_url: String,
}

impl FromRef<AppState> for IngestState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            http_client: state.http_client.clone(),
            feed_url: state.feed_url.clone(),
        }
    }
}

/// The response to a successful initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializeResponse {
    /// A human readable confirmation.
    pub message: String,
    /// The number of transactions now in the store.
    pub count: usize,
}

/// Download the feed and replace the store contents with it.
pub async fn initialize(
    State(state): State<IngestState>,
) -> Result<Json<InitializeResponse>, Error> {
    tracing::info!("fetching transaction feed from {}", state.feed_url);
    let transactions = fetch_feed(&state.http_client, &state.feed_url).await?;

    let store = state.store;
    let count = run_blocking(move || initialize_store(store.as_ref(), transactions))
        .await
        .map_err(|error| Error::IngestFailed(error.to_string()))?;

    Ok(Json(InitializeResponse {
        message: "Database initialized with transactions!".to_owned(),
        count,
    }))
}
