//! Route handlers for the monthly reports.
//!
//! Every handler validates the month with [SelectedMonth] before touching
//! the store, so invalid months are rejected the same way everywhere.

use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    extract::{FromRef, State},
};

use crate::{AppState, Error, month::SelectedMonth, store::TransactionStore};

use super::{
    categories::{CategoryReport, get_category_distribution},
    histogram::{PriceRangeReport, get_price_range_distribution},
    run_blocking,
    statistics::{StatisticsReport, get_monthly_statistics},
    summary::{SummaryReport, build_summary},
};

/// The state needed for the report endpoints.
#[derive(Clone)]
pub struct ReportState {
    /// The store to compute the reports from.
    pub store: Arc<dyn TransactionStore>,
    /// How long each aggregation of a summary may take.
    pub aggregation_timeout: Duration,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            aggregation_timeout: state.report_config.aggregation_timeout,
        }
    }
}

/// Get the sales statistics for a month.
pub async fn get_statistics_report(
    State(state): State<ReportState>,
    SelectedMonth(month): SelectedMonth,
) -> Result<Json<StatisticsReport>, Error> {
    let statistics = run_blocking(move || get_monthly_statistics(month, state.store.as_ref()))
        .await
        .inspect_err(|error| {
            tracing::error!("could not get statistics for {month:?}: {error}")
        })?;

    Ok(Json(StatisticsReport { month, statistics }))
}

/// Get the number of items sold per price range for a month.
pub async fn get_price_range_report(
    State(state): State<ReportState>,
    SelectedMonth(month): SelectedMonth,
) -> Result<Json<PriceRangeReport>, Error> {
    let price_range =
        run_blocking(move || get_price_range_distribution(month, state.store.as_ref()))
            .await
            .inspect_err(|error| {
                tracing::error!("could not get price ranges for {month:?}: {error}")
            })?;

    Ok(Json(PriceRangeReport { month, price_range }))
}

/// Get the number of items sold per category for a month.
pub async fn get_category_report(
    State(state): State<ReportState>,
    SelectedMonth(month): SelectedMonth,
) -> Result<Json<CategoryReport>, Error> {
    let category_distribution =
        run_blocking(move || get_category_distribution(month, state.store.as_ref()))
            .await
            .inspect_err(|error| {
                tracing::error!("could not get categories for {month:?}: {error}")
            })?;

    Ok(Json(CategoryReport {
        month,
        category_distribution,
    }))
}

/// Get the statistics, price ranges and categories for a month in one response.
pub async fn get_summary_report(
    State(state): State<ReportState>,
    SelectedMonth(month): SelectedMonth,
) -> Result<Json<SummaryReport>, Error> {
    let summary = build_summary(month, state.store, state.aggregation_timeout).await?;

    Ok(Json(summary))
}
