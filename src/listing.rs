//! Searchable, paged listing of the raw product transactions.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::Month,
    pagination::PaginationConfig,
    product::ProductTransaction,
    report::run_blocking,
    store::{TransactionQuery, TransactionStore},
};

/// The state needed for listing transactions.
#[derive(Clone)]
pub struct ListingState {
    /// The store to list transactions from.
    pub store: Arc<dyn TransactionStore>,
    /// The config that controls page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            pagination_config: state.pagination_config,
        }
    }
}

/// The query string for listing transactions. Every field is optional.
///
/// Numbers are kept as text so that bad values produce the same JSON errors
/// as the rest of the API.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListQuery {
    /// Text to look for in the title, description or category.
    pub search: Option<String>,
    /// The one-based page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub limit: Option<String>,
    /// Only list transactions from this month, 1 to 12.
    pub month: Option<String>,
}

/// One page of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// The page number that was returned.
    pub page: u64,
    /// The page size that was used.
    pub limit: u64,
    /// The transactions on the page, ordered by ID.
    pub transactions: Vec<ProductTransaction>,
}

/// List the transactions matching the search and month, one page at a time.
pub async fn get_transactions(
    State(state): State<ListingState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<TransactionPage>, Error> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("rejected unreadable listing query: {rejection}");
        Error::InvalidQuery
    })?;
    let page = state
        .pagination_config
        .page(query.page.as_deref(), query.limit.as_deref())?;
    let month = match query.month.as_deref() {
        Some(raw) => Some(Month::parse(Some(raw))?),
        None => None,
    };
    let search = query.search.filter(|search| !search.is_empty());

    let store_query = TransactionQuery {
        month,
        sold: None,
        search,
        limit: Some(page.size),
        offset: page.offset(),
    };

    let transactions = run_blocking(move || state.store.query(&store_query))
        .await
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?;

    Ok(Json(TransactionPage {
        page: page.number,
        limit: page.size,
        transactions,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        endpoints,
        product::ProductTransaction,
        test_utils::{StubStore, assert_error_body, get_test_server, march_transactions},
    };

    fn ids(body: &Value) -> Vec<i64> {
        body["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_first_page_by_default() {
        let transactions = (1..=15)
            .map(|id| ProductTransaction::build(id, 10.0, "books", true, date!(2022 - 01 - 01)))
            .collect();
        let server = get_test_server(Arc::new(StubStore::new(transactions)));

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(ids(&body), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn pages_through_transactions() {
        let server = get_test_server(Arc::new(StubStore::new(march_transactions())));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", "2")
            .add_query_param("limit", "3")
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 3);
        assert_eq!(ids(&body), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn filters_by_search_and_month() {
        let transactions = vec![
            ProductTransaction::build(1, 10.0, "books", true, date!(2022 - 03 - 01))
                .title("Rust in Action"),
            ProductTransaction::build(2, 10.0, "books", true, date!(2022 - 03 - 01))
                .description("A RUSTY old bike"),
            ProductTransaction::build(3, 10.0, "books", true, date!(2022 - 04 - 01))
                .title("Rust Atomics"),
            ProductTransaction::build(4, 10.0, "books", true, date!(2022 - 03 - 01))
                .title("Go in Action"),
        ];
        let server = get_test_server(Arc::new(StubStore::new(transactions)));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "rust")
            .add_query_param("month", "3")
            .await;

        response.assert_status_ok();
        assert_eq!(ids(&response.json::<Value>()), vec![1, 2]);
    }

    #[tokio::test]
    async fn serializes_records_with_feed_field_names() {
        let server = get_test_server(Arc::new(StubStore::new(march_transactions())));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("limit", "1")
            .await;

        let body = response.json::<Value>();
        let record = &body["transactions"][0];
        assert_eq!(record["id"], 1);
        assert_eq!(record["dateOfSale"], "2022-03-02");
        assert_eq!(record["sold"], true);
        assert_eq!(record["category"], "books");
    }

    #[tokio::test]
    async fn rejects_zero_limit() {
        let server = get_test_server(Arc::new(StubStore::new(march_transactions())));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("limit", "0")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error_body(
            &response.json::<Value>(),
            "Invalid limit. Provide a page size of at least 1.",
        );
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let store = Arc::new(StubStore::new(march_transactions()));
        let server = get_test_server(store.clone());

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "13")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error_body(
            &response.json::<Value>(),
            "Invalid month. Provide a value between 1 and 12.",
        );
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_parameters_are_a_json_client_error() {
        let store = Arc::new(StubStore::new(march_transactions()));
        let server = get_test_server(store.clone());

        for parameter in ["month", "page", "limit", "search"] {
            let response = server
                .get(endpoints::TRANSACTIONS)
                .add_query_param(parameter, "3")
                .add_query_param(parameter, "4")
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_error_body(
                &response.json::<Value>(),
                "Invalid query string. Provide each parameter at most once.",
            );
        }
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let server = get_test_server(Arc::new(StubStore::new(march_transactions())));

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", "50")
            .await;

        response.assert_status_ok();
        assert!(ids(&response.json::<Value>()).is_empty());
    }
}
