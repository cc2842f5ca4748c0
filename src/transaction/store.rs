//! Defines the capabilities a record store must provide for transactions.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::core::{NewTransaction, Transaction, TransactionPatch, TransactionType},
};

/// Handles the storage and retrieval of transactions.
///
/// Each operation is independent; implementers do not need to provide
/// guarantees across multiple operations.
pub trait TransactionStore {
    /// Store a new transaction, assigning its ID and creation timestamp.
    fn insert(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction, or `None` if `id` does not refer to a stored transaction.
    fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, Error>;

    /// Apply `patch` to a stored transaction and return the updated transaction,
    /// or `None` if `id` does not refer to a stored transaction.
    fn update_by_id(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>, Error>;

    /// Remove a transaction. Returns `false` if there was nothing to remove.
    fn delete_by_id(&self, id: TransactionId) -> Result<bool, Error>;

    /// Retrieve up to `limit` transactions matching `filter` in the order
    /// given by `sort`, skipping the first `skip` matches.
    fn find(
        &self,
        filter: &TransactionFilter,
        sort: Sort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions matching `filter`.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error>;

    /// Sum a field over the transactions matching `filter`, grouped by another field.
    ///
    /// Groups with no matching transactions are absent from the result.
    fn aggregate_sum_by_group(
        &self,
        filter: &TransactionFilter,
        request: GroupSum,
    ) -> Result<HashMap<String, f64>, Error>;
}

/// Constraints on which transactions a query matches.
///
/// Unset fields match every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only match transactions of this type.
    pub type_: Option<TransactionType>,
    /// Only match transactions with exactly this category.
    pub category: Option<String>,
    /// Only match transactions dated at or after this instant.
    pub date_from: Option<OffsetDateTime>,
    /// Only match transactions dated at or before this instant.
    pub date_to: Option<OffsetDateTime>,
}

/// A transaction field that query results can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// When the transaction happened.
    Date,
    /// The amount of money.
    Amount,
    /// Income or expense.
    Type,
    /// The category text.
    Category,
    /// The description text.
    Description,
    /// When the transaction was recorded.
    CreatedAt,
}

impl SortField {
    /// Look up a field by the name used in JSON, e.g. "createdAt".
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(SortField::Date),
            "amount" => Some(SortField::Amount),
            "type" => Some(SortField::Type),
            "category" => Some(SortField::Category),
            "description" => Some(SortField::Description),
            "createdAt" => Some(SortField::CreatedAt),
            _ => None,
        }
    }
}

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// How to order the results of [TransactionStore::find].
///
/// Transactions that compare equal are ordered by ascending ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// The field to sort by.
    pub field: SortField,
    /// The sort direction.
    pub order: SortOrder,
}

impl Default for Sort {
    /// Newest transactions first.
    fn default() -> Self {
        Self {
            field: SortField::Date,
            order: SortOrder::Descending,
        }
    }
}

/// A field that transactions can be grouped by for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    /// Group by income or expense. Keys are "income" and "expense".
    Type,
    /// Group by category text.
    Category,
}

/// A numeric field that can be summed in an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumField {
    /// The transaction amount.
    Amount,
}

/// A declarative aggregation request: sum `sum` within each `group_by` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSum {
    /// The field whose distinct values form the groups.
    pub group_by: GroupField,
    /// The field to sum within each group.
    pub sum: SumField,
}

impl GroupSum {
    /// Total amount per transaction type.
    pub const AMOUNT_BY_TYPE: GroupSum = GroupSum {
        group_by: GroupField::Type,
        sum: SumField::Amount,
    };
}
