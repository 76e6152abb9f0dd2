//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for. Larger sizes are capped.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The one-based page number.
    pub number: u64,
    /// The number of items per page.
    pub size: u64,
}

impl Page {
    /// The number of items before this page.
    ///
    /// Saturates at the largest offset SQLite accepts.
    pub fn offset(&self) -> u64 {
        self.number
            .saturating_sub(1)
            .saturating_mul(self.size)
            .min(i64::MAX as u64)
    }
}

impl PaginationConfig {
    /// Resolve the raw `page` and `limit` of a request into a [Page].
    ///
    /// A missing or non-integer page falls back to the default page and page
    /// numbers below 1 are clamped to 1. A missing limit falls back to the
    /// default page size and limits above [PaginationConfig::max_page_size]
    /// are capped.
    ///
    /// # Errors
    /// Returns [Error::InvalidPageSize] if `limit` is zero or not a positive integer.
    pub fn page(&self, page: Option<&str>, limit: Option<&str>) -> Result<Page, Error> {
        let size = match limit.map(|limit| limit.trim().parse::<u64>()) {
            None => self.default_page_size,
            Some(Ok(0)) | Some(Err(_)) => {
                tracing::debug!("rejected page size {limit:?}");
                return Err(Error::InvalidPageSize);
            }
            Some(Ok(limit)) => limit.min(self.max_page_size),
        };

        let number = match page.map(|page| page.trim().parse::<i64>()) {
            Some(Ok(page)) if page < 1 => 1,
            Some(Ok(page)) => page as u64,
            _ => self.default_page,
        };

        Ok(Page { number, size })
    }
}
