//! Suggested categories for the filter panel and the transaction form.

use std::collections::BTreeSet;

use crate::transaction::{Transaction, TransactionType};

/// Suggested categories for income.
pub const INCOME_CATEGORIES: [&str; 5] = [
    "Salary",
    "Freelance",
    "Investment",
    "Bonus",
    "Other Income",
];

/// Suggested categories for expenses.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food",
    "Rent",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Health",
    "Education",
    "Other Expense",
];

/// The suggested categories for a transaction type.
pub fn suggestions_for(type_: TransactionType) -> &'static [&'static str] {
    match type_ {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// The category choices for the filter panel.
///
/// A selected type narrows the choices to that type's suggestions. With no
/// type selected, the choices are every suggestion plus every category seen
/// in `transactions`, sorted and without duplicates.
pub fn filter_options(type_: Option<TransactionType>, transactions: &[Transaction]) -> Vec<String> {
    if let Some(type_) = type_ {
        return suggestions_for(type_)
            .iter()
            .map(|category| (*category).to_owned())
            .collect();
    }

    INCOME_CATEGORIES
        .iter()
        .chain(EXPENSE_CATEGORIES.iter())
        .copied()
        .chain(
            transactions
                .iter()
                .map(|transaction| transaction.category.as_str())
                .filter(|category| !category.is_empty()),
        )
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        dashboard::categories::{EXPENSE_CATEGORIES, INCOME_CATEGORIES, filter_options},
        transaction::{Transaction, TransactionType},
    };

    fn with_category(category: &str) -> Transaction {
        Transaction {
            id: 1,
            type_: TransactionType::Expense,
            amount: 1.0,
            description: String::new(),
            category: category.to_owned(),
            date: datetime!(2024-01-01 0:00 UTC),
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn type_narrows_options() {
        let transactions = [with_category("Pets")];

        assert_eq!(
            filter_options(Some(TransactionType::Income), &transactions),
            INCOME_CATEGORIES.to_vec()
        );
        assert_eq!(
            filter_options(Some(TransactionType::Expense), &transactions),
            EXPENSE_CATEGORIES.to_vec()
        );
    }

    #[test]
    fn all_types_merges_observed_categories() {
        let transactions = [
            with_category("Pets"),
            with_category("Food"),
            with_category(""),
            with_category("Pets"),
        ];

        let got = filter_options(None, &transactions);

        assert_eq!(got.len(), INCOME_CATEGORIES.len() + EXPENSE_CATEGORIES.len() + 1);
        assert!(got.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(got.contains(&"Pets".to_owned()));
        assert!(!got.contains(&String::new()));
    }
}
