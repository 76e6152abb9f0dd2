/*! This module sets up the application's database. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, product::create_product_transaction_table};

/// Create the tables for the domain models if they do not exist.
///
/// Safe to call on an existing database, previously stored transactions are kept.
///
/// # Errors
/// Returns an [Error::StoreError] if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_product_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
