//! The paginated transactions table on the dashboard.
//!
//! The table pages through the already filtered list held by the dashboard
//! state. Page links keep the active filters in the query string.

use maud::{Markup, html};
use serde::Deserialize;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    dashboard::filters::type_label,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    pagination::{PaginationIndicator, create_pagination_indicators, offset, page_count},
    transaction::{ListQuery, Transaction, TransactionType},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The query parameter that selects the page of the dashboard table.
#[derive(Debug, Default, Deserialize)]
pub struct TableView {
    /// The table page, starting at one.
    #[serde(default)]
    pub view_page: Option<String>,
}

impl TableView {
    fn page(&self) -> u64 {
        self.view_page
            .as_deref()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(1)
            .max(1)
    }
}

/// The settings for slicing the list into table pages.
pub(super) struct TableLayout {
    pub page_size: u64,
    pub max_pages: u64,
}

/// Renders one page of `transactions` with navigation links to the others.
pub(super) fn transactions_table_view(
    transactions: &[Transaction],
    filters: &ListQuery,
    view: &TableView,
    layout: &TableLayout,
) -> Markup {
    let total = transactions.len() as u64;
    let pages = page_count(total, layout.page_size);
    let page = view.page().min(pages);

    let start = usize::try_from(offset(page, layout.page_size)).unwrap_or(usize::MAX);
    let rows: Vec<&Transaction> = transactions
        .iter()
        .skip(start)
        .take(layout.page_size as usize)
        .collect();

    let indicators = create_pagination_indicators(page, pages, layout.max_pages);

    html! {
        section id="transactions" class="w-full mb-6 rounded-lg bg-white dark:bg-gray-800 overflow-x-auto"
        {
            header class="flex justify-between items-center p-4"
            {
                h2 class="text-lg font-semibold" { "Transactions" }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }
            }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in &rows {
                        (transaction_row_view(transaction, filters))
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td colspan="6" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }

            footer class="flex flex-col md:flex-row justify-between items-center gap-2 p-4"
            {
                p id="table-count" class="text-sm"
                {
                    "Showing " (rows.len()) " of " (total) " transactions"
                }

                @if pages > 1 {
                    (pagination_view(&indicators, filters))
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction, filters: &ListQuery) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = with_filters(
        &format_endpoint(endpoints::DELETE_TRANSACTION_VIEW, transaction.id),
        filters,
    );
    let date = transaction
        .date
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| transaction.date.date().to_string());
    let amount_style = match transaction.type_ {
        TransactionType::Income => "px-6 py-4 text-right text-green-700 dark:text-green-300",
        TransactionType::Expense => "px-6 py-4 text-right text-red-700 dark:text-red-300",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (date) }
            td class=(TABLE_CELL_STYLE) { (type_label(transaction.type_)) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(amount_style) { (format_currency(transaction.signed_amount())) }
            td class="px-6 py-4 flex gap-4"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                form
                    method="post"
                    action=(delete_url)
                    onsubmit="return confirm('Are you sure you want to delete this transaction?');"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

fn pagination_view(indicators: &[PaginationIndicator], filters: &ListQuery) -> Markup {
    html! {
        nav class="pagination"
        {
            ul class="pagination flex items-center gap-2"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class="font-bold" { (page) }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(filters, *page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(filters, *page)) role="button" class=(LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(filters, *page)) role="button" class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The dashboard URL for table page `page` with `filters` applied.
fn page_url(filters: &ListQuery, page: u64) -> String {
    let query = encode_filters(filters);

    if query.is_empty() {
        format!("{}?view_page={page}", endpoints::DASHBOARD_VIEW)
    } else {
        format!("{}?{query}&view_page={page}", endpoints::DASHBOARD_VIEW)
    }
}

/// The dashboard URL with `filters` applied.
pub(super) fn dashboard_url(filters: &ListQuery) -> String {
    with_filters(endpoints::DASHBOARD_VIEW, filters)
}

fn with_filters(path: &str, filters: &ListQuery) -> String {
    let query = encode_filters(filters);

    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

fn encode_filters(filters: &ListQuery) -> String {
    serde_urlencoded::to_string(filters)
        .inspect_err(|error| tracing::error!("could not encode dashboard filters: {error}"))
        .unwrap_or_default()
}
