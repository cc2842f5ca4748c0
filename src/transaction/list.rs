//! The combined list, filter and summary query over transactions.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::time};

use crate::{
    Error,
    pagination::{PaginationConfig, offset},
    transaction::{
        core::{Summary, Transaction, TransactionType},
        store::{GroupSum, Sort, SortField, SortOrder, TransactionFilter, TransactionStore},
        validation::{FieldError, parse_date},
    },
};

/// The query string accepted when listing transactions.
///
/// Every value is kept as raw text so that an empty value (`?type=`) can be
/// treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// "income" or "expense".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// An exact category to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The first day to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// The last day to include, inclusive of the whole day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// The page number, starting at one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// The number of transactions per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    /// The sort order as `field:direction`, e.g. `amount:asc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl ListQuery {
    /// Whether any of the type, category or date filters are set.
    pub fn has_active_filters(&self) -> bool {
        [&self.type_, &self.category, &self.start_date, &self.end_date]
            .into_iter()
            .any(|value| non_empty(value).is_some())
    }

    /// Build the store filter for this query.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the type or either date cannot be parsed.
    pub fn to_filter(&self) -> Result<TransactionFilter, Error> {
        let mut errors = Vec::new();

        let type_ = non_empty(&self.type_).and_then(|text| {
            text.parse::<TransactionType>()
                .inspect_err(|_| {
                    errors.push(FieldError::new("type", "must be one of [income, expense]"))
                })
                .ok()
        });

        let date_from = non_empty(&self.start_date)
            .and_then(|text| parse_query_date("startDate", text, &mut errors));

        let date_to = non_empty(&self.end_date)
            .and_then(|text| parse_query_date("endDate", text, &mut errors))
            .map(end_of_day);

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(TransactionFilter {
            type_,
            category: non_empty(&self.category).map(str::to_owned),
            date_from,
            date_to,
        })
    }

    /// Parse `sortBy`, defaulting to newest first.
    ///
    /// Unknown fields fall back to the date but keep the requested direction.
    pub fn sort(&self) -> Sort {
        let Some(sort_by) = non_empty(&self.sort_by) else {
            return Sort::default();
        };

        let (field, direction) = sort_by.split_once(':').unwrap_or((sort_by, ""));

        Sort {
            field: SortField::from_name(field).unwrap_or(SortField::Date),
            order: if direction == "asc" {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            },
        }
    }

    fn page_number(&self, config: &PaginationConfig) -> u64 {
        config.page(parse_number(&self.page))
    }

    fn page_size(&self, config: &PaginationConfig) -> u64 {
        config.limit(parse_number(&self.limit))
    }
}

/// One page of transactions plus a summary over every matching transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// The page number that was served, at least one.
    pub page: u64,
    /// The page size that was used.
    pub limit: u64,
    /// The number of matching transactions across all pages.
    pub total: u64,
    /// The transactions on this page, in sort order.
    pub items: Vec<Transaction>,
    /// Income and expense totals over every matching transaction.
    pub summary: Summary,
}

/// Every stored transaction, newest first, with totals by type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfilteredSnapshot {
    /// All transactions.
    pub items: Vec<Transaction>,
    /// Income and expense totals over all transactions.
    pub summary: Summary,
}

/// Fetch the page of transactions described by `query`.
///
/// The summary and total honor the filters but ignore paging.
///
/// # Errors
/// Returns [Error::Validation] if the query has an invalid type or date, or
/// an error from the store.
pub fn list_transactions(
    store: &impl TransactionStore,
    query: &ListQuery,
    config: &PaginationConfig,
) -> Result<TransactionPage, Error> {
    let filter = query.to_filter()?;
    let page = query.page_number(config);
    let limit = query.page_size(config);

    let items = store.find(&filter, query.sort(), offset(page, limit), limit)?;
    let total = store.count(&filter)?;
    let summary = summarize(store, &filter)?;

    Ok(TransactionPage {
        page,
        limit,
        total,
        items,
        summary,
    })
}

/// Fetch every transaction along with the overall totals.
///
/// # Errors
/// Returns an error from the store.
pub fn load_unfiltered_snapshot(
    store: &impl TransactionStore,
) -> Result<UnfilteredSnapshot, Error> {
    let filter = TransactionFilter::default();
    let items = store.find(&filter, Sort::default(), 0, u64::MAX)?;
    let summary = summarize(store, &filter)?;

    Ok(UnfilteredSnapshot { items, summary })
}

fn summarize(store: &impl TransactionStore, filter: &TransactionFilter) -> Result<Summary, Error> {
    let sums = store.aggregate_sum_by_group(filter, GroupSum::AMOUNT_BY_TYPE)?;

    Ok(Summary {
        income: sums
            .get(TransactionType::Income.as_str())
            .copied()
            .unwrap_or(0.0),
        expense: sums
            .get(TransactionType::Expense.as_str())
            .copied()
            .unwrap_or(0.0),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

fn parse_number(value: &Option<String>) -> Option<u64> {
    non_empty(value).and_then(|text| text.trim().parse().ok())
}

fn parse_query_date(
    field: &str,
    text: &str,
    errors: &mut Vec<FieldError>,
) -> Option<OffsetDateTime> {
    let parsed = parse_date(text);

    if parsed.is_none() {
        errors.push(FieldError::new(field, "must be a valid ISO 8601 date"));
    }

    parsed
}

/// The last millisecond of the calendar day containing `date_time`.
fn end_of_day(date_time: OffsetDateTime) -> OffsetDateTime {
    date_time.replace_time(time!(23:59:59.999))
}
