//! The month selector shared by every reporting endpoint.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A calendar month in the range 1 to 12, without a year.
///
/// To create a `Month`, use [Month::new] or [Month::parse]. Both reject values
/// outside 1 to 12 so a `Month` can be passed to the store without further
/// checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Month(u8);

impl Month {
    /// Create a month from its number, where January is 1.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `number` is not between 1 and 12.
    pub fn new(number: i64) -> Result<Self, Error> {
        match u8::try_from(number) {
            Ok(number @ 1..=12) => Ok(Self(number)),
            _ => Err(Error::InvalidMonth),
        }
    }

    /// Validate a raw month selector, e.g. from a query string.
    ///
    /// Leading zeros and surrounding whitespace are accepted, so "3", "03"
    /// and " 3 " all select March.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `raw` is missing, is not an integer,
    /// or is not between 1 and 12.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        let Some(raw) = raw else {
            tracing::debug!("rejected request with no month");
            return Err(Error::InvalidMonth);
        };

        raw.trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidMonth)
            .and_then(Self::new)
            .inspect_err(|_| tracing::debug!("rejected invalid month {raw:?}"))
    }

    /// The month number, where January is 1.
    pub fn number(self) -> u8 {
        self.0
    }

    /// The two digit, zero-padded form used to match the month of a stored date,
    /// e.g. "03" for March.
    pub fn as_query_value(self) -> String {
        format!("{:02}", self.0)
    }
}

/// The query string for endpoints that report on a single month.
///
/// The month is kept as raw text so that every endpoint rejects bad input in
/// the same way via [Month::parse]. Use [SelectedMonth] to extract it.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct MonthQuery {
    /// The month to report on, 1 to 12.
    pub month: Option<String>,
}

impl MonthQuery {
    /// Validate the month in the query.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month is missing or invalid.
    pub fn month(&self) -> Result<Month, Error> {
        Month::parse(self.month.as_deref())
    }
}

/// Extracts and validates the `month` query parameter.
///
/// Query strings that cannot be read at all, e.g. with a repeated `month`,
/// are rejected with [Error::InvalidMonth] like any other bad selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedMonth(pub Month);

impl<S: Send + Sync> FromRequestParts<S> for SelectedMonth {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<MonthQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("rejected unreadable month query: {rejection}");
                Error::InvalidMonth
            })?;

        query.month().map(SelectedMonth)
    }
}
