//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    product::{PRODUCT_TRANSACTION_COLUMNS, ProductTransaction, map_product_transaction_row},
    store::{TransactionQuery, TransactionStore},
};

/// Stores product transactions in a SQLite database.
///
/// The product transaction table must already exist, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// Escape the `LIKE` wildcards in `text` so that it only matches literally.
///
/// Backslash is the escape character.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Build the `WHERE` clause and its parameters for the filters in `query`.
///
/// Returns an empty clause when `query` has no filters.
fn where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(month) = query.month {
        query_parameters.push(Value::Text(month.as_query_value()));
        where_clause_parts.push(format!(
            "strftime('%m', date_of_sale) = ?{}",
            query_parameters.len()
        ));
    }

    if let Some(sold) = query.sold {
        query_parameters.push(Value::Integer(sold as i64));
        where_clause_parts.push(format!("sold = ?{}", query_parameters.len()));
    }

    if let Some(search) = &query.search {
        query_parameters.push(Value::Text(format!("%{}%", escape_like(search))));
        let placeholder = query_parameters.len();
        where_clause_parts.push(format!(
            "(title LIKE ?{placeholder} ESCAPE '\\' \
            OR description LIKE ?{placeholder} ESCAPE '\\' \
            OR category LIKE ?{placeholder} ESCAPE '\\')"
        ));
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            String::from(" WHERE ") + &where_clause_parts.join(" AND "),
            query_parameters,
        )
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Replace every transaction in the database inside a single SQL transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StoreError] if any insert fails, e.g. due to a duplicate ID,
    ///   in which case the previous transactions are kept,
    /// - or [Error::DatabaseLockError] if the connection lock is poisoned.
    fn replace_all(&self, transactions: Vec<ProductTransaction>) -> Result<usize, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        tx.execute("DELETE FROM product_transaction", ())?;

        let mut stmt = tx.prepare(
            "INSERT INTO product_transaction
                (id, title, description, price, category, image, sold, date_of_sale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for transaction in &transactions {
            stmt.execute((
                transaction.id,
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                &transaction.image,
                transaction.sold,
                transaction.date_of_sale,
            ))?;
        }

        drop(stmt);

        tx.commit()?;
        tracing::info!("replaced store contents with {} transactions", transactions.len());

        Ok(transactions.len())
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::StoreError] if there is a SQL error.
    fn query(&self, query: &TransactionQuery) -> Result<Vec<ProductTransaction>, Error> {
        let (where_clause, query_parameters) = where_clause(query);
        let mut query_string = format!(
            "SELECT {PRODUCT_TRANSACTION_COLUMNS} FROM product_transaction{where_clause} \
            ORDER BY id ASC"
        );

        match query.limit {
            Some(limit) => {
                query_string.push_str(&format!(" LIMIT {limit} OFFSET {}", query.offset))
            }
            None if query.offset > 0 => {
                query_string.push_str(&format!(" LIMIT -1 OFFSET {}", query.offset))
            }
            None => {}
        }

        self.lock()?
            .prepare(&query_string)?
            .query_map(
                params_from_iter(query_parameters.iter()),
                map_product_transaction_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Count the transactions in the database that match `query`.
    ///
    /// # Errors
    /// This function will return a [Error::StoreError] if there is a SQL error.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        let (where_clause, query_parameters) = where_clause(query);

        let count: i64 = self.lock()?.query_row(
            &format!("SELECT COUNT(*) FROM product_transaction{where_clause}"),
            params_from_iter(query_parameters.iter()),
            |row| row.get(0),
        )?;

        u64::try_from(count).map_err(|error| {
            tracing::error!("SQLite returned an invalid count {count}: {error}");
            Error::StoreError(error.to_string())
        })
    }

    /// Sum the prices of the transactions in the database that match `query`.
    ///
    /// # Errors
    /// This function will return a [Error::StoreError] if there is a SQL error.
    fn total_price(&self, query: &TransactionQuery) -> Result<f64, Error> {
        let (where_clause, query_parameters) = where_clause(query);

        self.lock()?
            .query_row(
                &format!(
                    "SELECT COALESCE(SUM(price), 0.0) FROM product_transaction{where_clause}"
                ),
                params_from_iter(query_parameters.iter()),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    /// Get the prices of the transactions in the database that match `query`.
    ///
    /// # Errors
    /// This function will return a [Error::StoreError] if there is a SQL error.
    fn prices(&self, query: &TransactionQuery) -> Result<Vec<f64>, Error> {
        let (where_clause, query_parameters) = where_clause(query);

        self.lock()?
            .prepare(&format!(
                "SELECT price FROM product_transaction{where_clause} ORDER BY id ASC"
            ))?
            .query_map(params_from_iter(query_parameters.iter()), |row| row.get(0))?
            .map(|maybe_price| maybe_price.map_err(Error::from))
            .collect()
    }
}
