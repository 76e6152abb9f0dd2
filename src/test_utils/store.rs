use std::{
    collections::HashMap,
    sync::{
        RwLock,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use time::macros::date;

use crate::{
    Error, ProductTransaction,
    store::{TransactionQuery, TransactionStore},
};

/// The store methods that a [StubStore] can be told to fail or stall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum StoreCall {
    ReplaceAll,
    Query,
    Count,
    TotalPrice,
    Prices,
}

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Fail,
    Stall(Duration),
}

/// An in-memory [TransactionStore] that counts calls and can inject failures.
#[derive(Debug, Default)]
pub(crate) struct StubStore {
    transactions: RwLock<Vec<ProductTransaction>>,
    calls: AtomicUsize,
    behaviours: HashMap<StoreCall, Behaviour>,
}

impl StubStore {
    pub(crate) fn new(transactions: Vec<ProductTransaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
            ..Default::default()
        }
    }

    /// Make every call to `call` return a store error.
    pub(crate) fn fail_on(mut self, call: StoreCall) -> Self {
        self.behaviours.insert(call, Behaviour::Fail);
        self
    }

    /// Make every call to `call` block the calling thread for `duration`.
    pub(crate) fn stall_on(mut self, call: StoreCall, duration: Duration) -> Self {
        self.behaviours.insert(call, Behaviour::Stall(duration));
        self
    }

    /// The number of store calls made so far.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, call: StoreCall) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behaviours.get(&call) {
            Some(Behaviour::Fail) => Err(Error::StoreError(format!("injected {call:?} failure"))),
            Some(Behaviour::Stall(duration)) => {
                thread::sleep(*duration);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn matching(&self, query: &TransactionQuery) -> Vec<ProductTransaction> {
        let mut matching: Vec<_> = self
            .transactions
            .read()
            .unwrap()
            .iter()
            .filter(|transaction| query.matches(transaction))
            .cloned()
            .collect();
        matching.sort_by_key(|transaction| transaction.id);
        matching
    }
}

impl TransactionStore for StubStore {
    fn replace_all(&self, transactions: Vec<ProductTransaction>) -> Result<usize, Error> {
        self.record(StoreCall::ReplaceAll)?;
        let count = transactions.len();
        *self.transactions.write().unwrap() = transactions;
        Ok(count)
    }

    fn query(&self, query: &TransactionQuery) -> Result<Vec<ProductTransaction>, Error> {
        self.record(StoreCall::Query)?;
        let matching = self.matching(query).into_iter().skip(query.offset as usize);

        Ok(match query.limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }

    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        self.record(StoreCall::Count)?;
        Ok(self.matching(query).len() as u64)
    }

    fn total_price(&self, query: &TransactionQuery) -> Result<f64, Error> {
        self.record(StoreCall::TotalPrice)?;
        Ok(self
            .matching(query)
            .iter()
            .map(|transaction| transaction.price)
            .sum())
    }

    fn prices(&self, query: &TransactionQuery) -> Result<Vec<f64>, Error> {
        self.record(StoreCall::Prices)?;
        Ok(self
            .matching(query)
            .iter()
            .map(|transaction| transaction.price)
            .collect())
    }
}

/// Transactions where the sold items in March have the prices 50, 150, 150
/// and 999, plus unsold items and items from other months.
pub(crate) fn march_transactions() -> Vec<ProductTransaction> {
    vec![
        ProductTransaction::build(1, 50.0, "books", true, date!(2022 - 03 - 02)),
        ProductTransaction::build(2, 150.0, "electronics", true, date!(2021 - 03 - 10)),
        ProductTransaction::build(3, 150.0, "books", true, date!(2022 - 03 - 28)),
        ProductTransaction::build(4, 999.0, "jewelery", true, date!(2022 - 03 - 31)),
        ProductTransaction::build(5, 300.0, "books", false, date!(2022 - 03 - 05)),
        ProductTransaction::build(6, 45.0, "electronics", false, date!(2022 - 03 - 06)),
        ProductTransaction::build(7, 500.0, "books", true, date!(2022 - 04 - 01)),
        ProductTransaction::build(8, 25.0, "toys", true, date!(2022 - 02 - 28)),
    ]
}
