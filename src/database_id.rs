//! Database ID type definition.

/// Alias for the integer type used for transaction IDs.
///
/// IDs come from the transaction feed rather than from SQLite.
pub type TransactionId = i64;
