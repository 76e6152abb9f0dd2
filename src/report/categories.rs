//! Counts of sold items per category, for pie charts.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    Error,
    month::Month,
    product::ProductTransaction,
    store::{TransactionQuery, TransactionStore},
};

/// The number of sold items in each category, most common category first.
///
/// Only categories with at least one item are present. Categories with the
/// same count keep the order in which the store returned them, i.e. by the ID
/// of their first transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryDistribution {
    counts: Vec<(String, u64)>,
}

impl CategoryDistribution {
    /// Count `transactions` by category.
    pub fn from_transactions<'a>(
        transactions: impl IntoIterator<Item = &'a ProductTransaction>,
    ) -> Self {
        let mut counts: Vec<(String, u64)> = Vec::new();

        for transaction in transactions {
            match counts
                .iter_mut()
                .find(|(category, _)| *category == transaction.category)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((transaction.category.clone(), 1)),
            }
        }

        // Stable sort, so ties keep their first-seen order.
        counts.sort_by(|(_, a), (_, b)| b.cmp(a));

        Self { counts }
    }

    /// The number of items in `category`, zero if it is absent.
    pub fn count(&self, category: &str) -> u64 {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    /// The number of items across all categories.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Each category with its count, most common category first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts
            .iter()
            .map(|(category, count)| (category.as_str(), *count))
    }

    /// Whether no items were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Serialize for CategoryDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;

        for (category, count) in self.iter() {
            map.serialize_entry(category, &count)?;
        }

        map.end()
    }
}

/// The category distribution for a month as returned by the API, tagged with the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    /// The month the distribution is for.
    pub month: Month,
    /// The number of sold items per category.
    pub category_distribution: CategoryDistribution,
}

/// Count the items sold in `month` by category.
///
/// # Errors
/// Returns an [Error::StoreError] if the transactions cannot be read from the store.
pub fn get_category_distribution(
    month: Month,
    store: &dyn TransactionStore,
) -> Result<CategoryDistribution, Error> {
    let transactions = store.query(&TransactionQuery::sold_in(month))?;

    Ok(CategoryDistribution::from_transactions(&transactions))
}
