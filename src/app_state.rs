//! Implements a struct that holds the state of the REST server.

use std::{sync::Arc, time::Duration};

use crate::{ingest::DEFAULT_FEED_URL, pagination::PaginationConfig, store::TransactionStore};

/// The config that controls how monthly reports are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// How long each aggregation of a monthly summary may run before the
    /// summary is abandoned.
    pub aggregation_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            aggregation_timeout: Duration::from_secs(5),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for the product transactions.
    pub store: Arc<dyn TransactionStore>,

    /// The client used to download the transaction feed.
    pub http_client: reqwest::Client,

    /// The URL of the JSON transaction feed.
    pub feed_url: String,

    /// The config that controls how monthly reports are computed.
    pub report_config: ReportConfig,

    /// The config that controls how to page transaction listings.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] around `store` with the default feed URL and configs.
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            store,
            http_client: reqwest::Client::new(),
            feed_url: DEFAULT_FEED_URL.to_owned(),
            report_config: ReportConfig::default(),
            pagination_config: PaginationConfig::default(),
        }
    }

    /// Use `feed_url` as the transaction feed.
    pub fn with_feed_url(mut self, feed_url: impl Into<String>) -> Self {
        self.feed_url = feed_url.into();
        self
    }

    /// Use `report_config` for the monthly reports.
    pub fn with_report_config(mut self, report_config: ReportConfig) -> Self {
        self.report_config = report_config;
        self
    }

    /// Use `pagination_config` for the transaction listings.
    pub fn with_pagination_config(mut self, pagination_config: PaginationConfig) -> Self {
        self.pagination_config = pagination_config;
        self
    }
}
