//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::database_id::TransactionId;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is neither "income" nor "expense".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid transaction type")]
pub struct InvalidTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = InvalidTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(InvalidTransactionType(other.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and insert the
/// result into a [TransactionStore](crate::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// A free text category, e.g. "Food" or "Salary".
    pub category: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(type_: TransactionType, amount: f64, date: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            type_,
            amount,
            description: String::new(),
            category: String::new(),
            date: truncate_to_millis(date),
        }
    }

    /// The signed contribution of this transaction to a net balance.
    pub fn signed_amount(&self) -> f64 {
        match self.type_ {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A validated transaction that has not been stored yet.
///
/// The store assigns the ID and creation timestamp on insertion.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let new_transaction = Transaction::build(
///         TransactionType::Expense,
///         45.99,
///         datetime!(2025-01-15 0:00 UTC),
///     )
///     .category("Food")
///     .description("Coffee shop purchase");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    pub type_: TransactionType,
    /// The amount of money, must not be negative.
    pub amount: f64,
    /// Defaults to an empty string.
    pub description: String,
    /// Defaults to an empty string.
    pub category: String,
    /// When the transaction happened, with millisecond precision.
    pub date: OffsetDateTime,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }
}

/// A partial update for a stored transaction.
///
/// Fields set to `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// The new transaction type.
    pub type_: Option<TransactionType>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new description.
    pub description: Option<String>,
    /// The new category.
    pub category: Option<String>,
    /// The new date.
    pub date: Option<OffsetDateTime>,
}

impl TransactionPatch {
    /// Overwrite the fields of `transaction` that are set in the patch.
    ///
    /// The ID and creation timestamp are never touched.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(type_) = self.type_ {
            transaction.type_ = type_;
        }

        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }

        if let Some(description) = &self.description {
            transaction.description = description.clone();
        }

        if let Some(category) = &self.category {
            transaction.category = category.clone();
        }

        if let Some(date) = self.date {
            transaction.date = date;
        }
    }
}

/// Total income and expenses over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
}

impl Summary {
    /// Sum the amounts of `transactions` by type.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Summary::default(), |mut summary, transaction| {
                summary.add(transaction.type_, transaction.amount);
                summary
            })
    }

    /// Add `amount` to the total for `type_`. Use a negative amount to subtract.
    pub fn add(&mut self, type_: TransactionType, amount: f64) {
        match type_ {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }

    /// Income minus expenses.
    pub fn net_balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Drop any precision finer than a millisecond, the resolution used by the store.
pub(crate) fn truncate_to_millis(date_time: OffsetDateTime) -> OffsetDateTime {
    let sub_millis = date_time.nanosecond() % 1_000_000;
    date_time - Duration::nanoseconds(i64::from(sub_millis))
}
