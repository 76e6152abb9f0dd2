//! The API endpoints URIs.

/// The route that loads the transaction feed into the store.
pub const INITIALIZE: &str = "/initialize";
/// The route for searching and paging through transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales statistics of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price range histogram of a month.
pub const BAR_CHART: &str = "/barchart";
/// The route for the category distribution of a month.
pub const PIE_CHART: &str = "/piechart";
/// The route for the combined report of a month.
pub const SUMMARY: &str = "/summary";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::INITIALIZE);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
        assert_endpoint_is_valid_uri(endpoints::PIE_CHART);
        assert_endpoint_is_valid_uri(endpoints::SUMMARY);
    }
}
