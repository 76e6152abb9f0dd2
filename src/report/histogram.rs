//! Counts of sold items per fixed price range, for bar charts.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    Error,
    month::Month,
    store::{TransactionQuery, TransactionStore},
};

/// One of the ten fixed price ranges used by the price histogram.
///
/// The ranges are contiguous and every price falls in exactly one of them.
/// A price above a range's upper bound but below the next range's label
/// (e.g. 100.50) belongs to the next range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    /// Up to and including 100.
    UpTo100,
    /// Above 100 up to and including 200.
    UpTo200,
    /// Above 200 up to and including 300.
    UpTo300,
    /// Above 300 up to and including 400.
    UpTo400,
    /// Above 400 up to and including 500.
    UpTo500,
    /// Above 500 up to and including 600.
    UpTo600,
    /// Above 600 up to and including 700.
    UpTo700,
    /// Above 700 up to and including 800.
    UpTo800,
    /// Above 800 up to and including 900.
    UpTo900,
    /// Above 900.
    Above900,
}

impl PriceBucket {
    /// Every bucket, from cheapest to most expensive.
    pub const ALL: [PriceBucket; 10] = [
        PriceBucket::UpTo100,
        PriceBucket::UpTo200,
        PriceBucket::UpTo300,
        PriceBucket::UpTo400,
        PriceBucket::UpTo500,
        PriceBucket::UpTo600,
        PriceBucket::UpTo700,
        PriceBucket::UpTo800,
        PriceBucket::UpTo900,
        PriceBucket::Above900,
    ];

    /// Find the bucket for `price`.
    pub fn for_price(price: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.upper_bound().is_none_or(|bound| price <= bound))
            // NaN fails every comparison and ends up in the open-ended bucket.
            .unwrap_or(PriceBucket::Above900)
    }

    /// The largest price in the bucket, or `None` for the open-ended top bucket.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            PriceBucket::Above900 => None,
            bucket => Some(100.0 * (bucket.index() + 1) as f64),
        }
    }

    /// The label used in API responses, e.g. "101-200".
    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::UpTo100 => "0-100",
            PriceBucket::UpTo200 => "101-200",
            PriceBucket::UpTo300 => "201-300",
            PriceBucket::UpTo400 => "301-400",
            PriceBucket::UpTo500 => "401-500",
            PriceBucket::UpTo600 => "501-600",
            PriceBucket::UpTo700 => "601-700",
            PriceBucket::UpTo800 => "701-800",
            PriceBucket::UpTo900 => "801-900",
            PriceBucket::Above900 => "901-above",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The number of items in each [PriceBucket].
///
/// Always holds a count for all ten buckets, so it serializes to a map with
/// every label, in bucket order, even when the counts are zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PriceRangeDistribution {
    counts: [u64; 10],
}

impl PriceRangeDistribution {
    /// Count `prices` by bucket.
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let mut distribution = Self::default();

        for price in prices {
            distribution.counts[PriceBucket::for_price(price).index()] += 1;
        }

        distribution
    }

    /// The number of items in `bucket`.
    pub fn count(&self, bucket: PriceBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// The number of items across all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Each bucket with its count, from cheapest to most expensive.
    pub fn iter(&self) -> impl Iterator<Item = (PriceBucket, u64)> + '_ {
        PriceBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.count(bucket)))
    }
}

impl Serialize for PriceRangeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PriceBucket::ALL.len()))?;

        for (bucket, count) in self.iter() {
            map.serialize_entry(bucket.label(), &count)?;
        }

        map.end()
    }
}

/// The price histogram for a month as returned by the API, tagged with the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRangeReport {
    /// The month the histogram is for.
    pub month: Month,
    /// The number of sold items per price range.
    pub price_range: PriceRangeDistribution,
}

/// Count the items sold in `month` by price range.
///
/// # Errors
/// Returns an [Error::StoreError] if the prices cannot be read from the store.
pub fn get_price_range_distribution(
    month: Month,
    store: &dyn TransactionStore,
) -> Result<PriceRangeDistribution, Error> {
    let prices = store.prices(&TransactionQuery::sold_in(month))?;

    Ok(PriceRangeDistribution::from_prices(prices))
}
