//! Data aggregation for the dashboard charts.

use std::collections::{BTreeMap, BTreeSet};

use crate::transaction::{Summary, Transaction, TransactionType};

/// The number of most recent months shown in the expense breakdown.
pub(super) const EXPENSE_MONTHS: usize = 6;

/// A calendar month in UTC, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct YearMonth {
    pub year: i32,
    /// 1 is January.
    pub month: u8,
}

impl YearMonth {
    fn of(transaction: &Transaction) -> Self {
        Self {
            year: transaction.date.year(),
            month: transaction.date.month() as u8,
        }
    }

    /// Format as "YYYY-MM".
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Expense totals per category for a run of months.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct MonthlyExpenses {
    /// The months in chronological order.
    pub months: Vec<YearMonth>,
    /// Every category seen in expense data, sorted.
    pub categories: Vec<String>,
    /// For each category, the total for each month in [MonthlyExpenses::months].
    pub totals: Vec<Vec<f64>>,
}

/// The slices for the income vs expense pie chart, omitting empty slices.
pub(super) fn income_expense_slices(summary: Summary) -> Vec<(&'static str, f64)> {
    [("Income", summary.income), ("Expense", summary.expense)]
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .collect()
}

/// Group expenses by month and category, keeping the most recent
/// [EXPENSE_MONTHS] months that have expenses.
///
/// Months without an expense in some category get zero for that category.
pub(super) fn group_monthly_expenses_by_category(transactions: &[Transaction]) -> MonthlyExpenses {
    let expenses = transactions
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense);

    let mut by_month: BTreeMap<YearMonth, BTreeMap<&str, f64>> = BTreeMap::new();
    let mut categories = BTreeSet::new();

    for transaction in expenses {
        categories.insert(transaction.category.as_str());
        *by_month
            .entry(YearMonth::of(transaction))
            .or_default()
            .entry(transaction.category.as_str())
            .or_default() += transaction.amount;
    }

    let skip = by_month.len().saturating_sub(EXPENSE_MONTHS);
    let recent: Vec<(YearMonth, BTreeMap<&str, f64>)> = by_month.into_iter().skip(skip).collect();

    let totals: Vec<Vec<f64>> = categories
        .iter()
        .map(|category| {
            recent
                .iter()
                .map(|(_, sums)| sums.get(category).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    MonthlyExpenses {
        months: recent.iter().map(|(month, _)| *month).collect(),
        categories: categories.into_iter().map(str::to_owned).collect(),
        totals,
    }
}
