//! Defines the transaction store trait that the reports are computed against.

mod sqlite;

pub use sqlite::SQLiteTransactionStore;

use crate::{Error, month::Month, product::ProductTransaction};

/// Handles the bulk replacement and filtered retrieval of product transactions.
///
/// Reports only ever read from the store, and implementers must allow reads
/// from several threads at once since a summary runs its aggregations
/// concurrently.
pub trait TransactionStore: Send + Sync {
    /// Replace every transaction in the store with `transactions`.
    ///
    /// Implementers should either apply the whole replacement or leave the
    /// store unchanged.
    ///
    /// Returns the number of transactions stored.
    fn replace_all(&self, transactions: Vec<ProductTransaction>) -> Result<usize, Error>;

    /// Retrieve the transactions matching `query`, ordered by ID.
    fn query(&self, query: &TransactionQuery) -> Result<Vec<ProductTransaction>, Error>;

    /// Count the transactions matching `query`, ignoring its limit and offset.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error>;

    /// Sum the prices of the transactions matching `query`, ignoring its limit
    /// and offset.
    ///
    /// Returns zero when no transaction matches.
    fn total_price(&self, query: &TransactionQuery) -> Result<f64, Error>;

    /// Retrieve only the prices of the transactions matching `query`.
    fn prices(&self, query: &TransactionQuery) -> Result<Vec<f64>, Error>;
}

/// Defines which transactions a [TransactionStore] call applies to.
///
/// Each field narrows the selection and `None` means "any".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions sold or listed in `month` of any year.
    pub month: Option<Month>,
    /// Include only sold (`true`) or unsold (`false`) transactions.
    pub sold: Option<bool>,
    /// Include transactions whose title, description or category contains
    /// this text, ignoring ASCII case.
    pub search: Option<String>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Skip this many transactions before applying `limit`.
    pub offset: u64,
}

impl TransactionQuery {
    /// Select the sold transactions in `month`.
    pub fn sold_in(month: Month) -> Self {
        Self {
            month: Some(month),
            sold: Some(true),
            ..Default::default()
        }
    }

    /// Select the unsold transactions in `month`.
    pub fn unsold_in(month: Month) -> Self {
        Self {
            month: Some(month),
            sold: Some(false),
            ..Default::default()
        }
    }

    /// Whether `transaction` satisfies the filters of this query.
    ///
    /// Limit and offset are not considered.
    pub fn matches(&self, transaction: &ProductTransaction) -> bool {
        let month_matches = self
            .month
            .is_none_or(|month| u8::from(transaction.date_of_sale.month()) == month.number());
        let sold_matches = self.sold.is_none_or(|sold| transaction.sold == sold);
        let search_matches = self.search.as_deref().is_none_or(|search| {
            let search = search.to_ascii_lowercase();
            [
                &transaction.title,
                &transaction.description,
                &transaction.category,
            ]
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(&search))
        });

        month_matches && sold_matches && search_matches
    }
}
