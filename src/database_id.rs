//! Database ID type definition.

/// Alias for the integer type used for transaction IDs.
///
/// IDs come from an `AUTOINCREMENT` column, so an ID is never reused after
/// its transaction is deleted.
pub type TransactionId = i64;
