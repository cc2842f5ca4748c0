//! The state behind the dashboard and the actions that change it.
//!
//! The dashboard keeps two lists: the current page shown in the table, which
//! honors the active filters, and an unfiltered snapshot of every transaction
//! that feeds the summary cards and charts. Totals are kept incrementally as
//! write results arrive and can be rebuilt from the snapshot with
//! [ClientState::recompute_totals].

use crate::{
    database_id::TransactionId,
    transaction::{ListQuery, Summary, Transaction, TransactionPage, TransactionType},
};

/// The transactions, filters and totals shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// The current, possibly filtered, list of transactions.
    pub transactions: Vec<Transaction>,
    /// Every transaction, regardless of the active filters.
    pub all_transactions: Vec<Transaction>,
    /// The filters applied to [ClientState::transactions].
    pub filters: ListQuery,
    /// Whether a list fetch is in progress.
    pub loading: bool,
    /// The message from the last failed fetch.
    pub error: Option<String>,
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
}

/// Something that happened which the dashboard state must reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user chose new filters.
    SetFilters(ListQuery),
    /// A fetch of the filtered list started.
    ListFetchStarted,
    /// A fetch of the filtered list succeeded.
    ListFetched(TransactionPage),
    /// A fetch of the filtered list failed with the given message.
    ListFetchFailed(String),
    /// The unfiltered list arrived, with the server's totals if it sent them.
    SummaryFetched {
        /// Every transaction.
        items: Vec<Transaction>,
        /// Totals by type, computed by the server.
        summary: Option<Summary>,
    },
    /// A transaction was created.
    Created(Transaction),
    /// A transaction was updated. Holds the updated record.
    Updated(Transaction),
    /// A transaction was deleted.
    Deleted(TransactionId),
}

impl ClientState {
    /// Apply `action` to the state.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetFilters(filters) => self.filters = filters,
            Action::ListFetchStarted => self.loading = true,
            Action::ListFetched(page) => {
                self.loading = false;
                self.error = None;

                if !self.filters.has_active_filters() {
                    self.all_transactions = page.items.clone();
                }

                self.transactions = page.items;
            }
            Action::ListFetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Action::SummaryFetched { items, summary } => {
                self.all_transactions = items;

                match summary {
                    Some(summary) => {
                        self.total_income = summary.income;
                        self.total_expense = summary.expense;
                    }
                    None => self.recompute_totals(),
                }
            }
            Action::Created(transaction) => {
                self.add_to_totals(transaction.type_, transaction.amount);
                self.transactions.insert(0, transaction.clone());
                self.all_transactions.insert(0, transaction);
            }
            Action::Updated(transaction) => {
                let Some(previous) = self.find_known(transaction.id) else {
                    return;
                };

                self.add_to_totals(previous.type_, -previous.amount);
                self.add_to_totals(transaction.type_, transaction.amount);

                for list in [&mut self.transactions, &mut self.all_transactions] {
                    if let Some(slot) = list.iter_mut().find(|t| t.id == transaction.id) {
                        *slot = transaction.clone();
                    }
                }
            }
            Action::Deleted(id) => {
                if let Some(previous) = self.find_known(id) {
                    self.add_to_totals(previous.type_, -previous.amount);
                }

                self.transactions.retain(|transaction| transaction.id != id);
                self.all_transactions
                    .retain(|transaction| transaction.id != id);
            }
        }
    }

    /// Rebuild the totals from the unfiltered snapshot.
    pub fn recompute_totals(&mut self) {
        let summary = Summary::from_transactions(&self.all_transactions);
        self.total_income = summary.income;
        self.total_expense = summary.expense;
    }

    /// The current totals.
    pub fn summary(&self) -> Summary {
        Summary {
            income: self.total_income,
            expense: self.total_expense,
        }
    }

    /// The known copy of a transaction, preferring the current page over the snapshot.
    fn find_known(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions
            .iter()
            .chain(self.all_transactions.iter())
            .find(|transaction| transaction.id == id)
            .cloned()
    }

    fn add_to_totals(&mut self, type_: TransactionType, amount: f64) {
        match type_ {
            TransactionType::Income => self.total_income += amount,
            TransactionType::Expense => self.total_expense += amount,
        }
    }
}
