//! Dashboard HTTP handler and view rendering.
//!
//! The handler replays the fetches a browser client would make against the
//! transaction service through [ClientState] and renders the resulting state.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, PreEscaped, html};

use crate::{
    Error,
    dashboard::{
        cards::summary_cards_view,
        charts::{ECHARTS_URL, build_dashboard_charts, charts_script, charts_view},
        client_state::{Action, ClientState},
        filters::filters_view,
        table::{TableLayout, TableView, transactions_table_view},
    },
    endpoints,
    html::{HeadElement, LINK_STYLE, base},
    pagination::PaginationConfig,
    transaction::{
        ListQuery, TransactionState, TransactionStore, list_transactions,
        load_unfiltered_snapshot,
    },
};

/// Display a page with an overview of the user's income and expenses.
///
/// The filters in the query string narrow the table but not the summary
/// cards or charts.
pub async fn get_dashboard_page(
    State(state): State<TransactionState>,
    Query(filters): Query<ListQuery>,
    Query(view): Query<TableView>,
) -> Response {
    let client = match load_client_state(&state.store, filters, &state.pagination_config) {
        Ok(client) => client,
        Err(error) => return error.into_page_response(),
    };

    dashboard_view(&client, &view, &table_layout(&state.pagination_config), None).into_response()
}

/// Render the dashboard from `client` as the response to a form submission.
///
/// The address bar is reset to `location` so that reloading the page fetches
/// the dashboard instead of submitting the form again.
pub(super) fn dashboard_after_write(
    client: &ClientState,
    config: &PaginationConfig,
    location: &str,
) -> Response {
    dashboard_view(client, &TableView::default(), &table_layout(config), Some(location))
        .into_response()
}

fn table_layout(config: &PaginationConfig) -> TableLayout {
    TableLayout {
        page_size: config.table_page_size,
        max_pages: config.max_pages,
    }
}

/// Build the dashboard state from a filtered list fetch followed by a fetch
/// of the unfiltered snapshot.
///
/// A failed list fetch is recorded in the state. A failed snapshot fetch
/// fails the whole page.
pub(super) fn load_client_state(
    store: &impl TransactionStore,
    filters: ListQuery,
    config: &PaginationConfig,
) -> Result<ClientState, Error> {
    let mut client = ClientState::default();

    let list_query = ListQuery {
        page: None,
        limit: Some(config.max_page_size.to_string()),
        ..filters.clone()
    };

    client.dispatch(Action::SetFilters(filters));
    client.dispatch(Action::ListFetchStarted);

    match list_transactions(store, &list_query, config) {
        Ok(page) => client.dispatch(Action::ListFetched(page)),
        Err(error) => {
            tracing::error!("could not load transactions for the dashboard: {error}");
            client.dispatch(Action::ListFetchFailed(list_error_message(&error)));
        }
    }

    let snapshot = load_unfiltered_snapshot(store)
        .inspect_err(|error| tracing::error!("could not load the transaction summary: {error}"))?;

    client.dispatch(Action::SummaryFetched {
        items: snapshot.items,
        summary: Some(snapshot.summary),
    });

    Ok(client)
}

fn list_error_message(error: &Error) -> String {
    match error {
        Error::Validation(errors) => {
            let details = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("Invalid filters: {details}")
        }
        _ => "Failed to load transactions".to_owned(),
    }
}

fn dashboard_view(
    client: &ClientState,
    view: &TableView,
    layout: &TableLayout,
    location: Option<&str>,
) -> Markup {
    let charts = build_dashboard_charts(client.summary(), &client.all_transactions);

    let content = html!(
        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full flex justify-between items-center mb-6"
            {
                h1 class="text-2xl font-bold" { "Finance Dashboard" }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }
            }

            @if let Some(error) = &client.error {
                div
                    id="dashboard-error"
                    role="alert"
                    class="w-full mb-6 p-4 rounded-lg text-red-800 bg-red-50
                        dark:bg-gray-800 dark:text-red-400"
                {
                    (error)
                }
            }

            (summary_cards_view(client.summary()))

            (charts_view(&charts))

            (filters_view(&client.filters, &client.all_transactions))

            (transactions_table_view(&client.transactions, &client.filters, view, layout))
        }
    );

    let mut scripts = vec![
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    if let Some(location) = location {
        let location = serde_json::to_string(location).unwrap_or_else(|_| "\"/\"".to_owned());
        scripts.push(HeadElement::ScriptSource(PreEscaped(format!(
            "history.replaceState(null, '', {location});"
        ))));
    }

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        dashboard::{handlers::get_dashboard_page, table::TableView},
        test_utils::{
            assert_valid_html, get_test_transaction_state, must_get_text, parse_html_document,
        },
        transaction::{ListQuery, Transaction, TransactionState, TransactionStore, TransactionType},
    };

    fn insert_sample_transactions(state: &TransactionState) {
        let samples = [
            (TransactionType::Income, 100.0, "Salary", datetime!(2024-01-05 0:00 UTC)),
            (TransactionType::Expense, 40.0, "Food", datetime!(2024-01-10 0:00 UTC)),
            (TransactionType::Income, 25.0, "Bonus", datetime!(2024-02-01 0:00 UTC)),
        ];

        for (type_, amount, category, date) in samples {
            state
                .store
                .insert(Transaction::build(type_, amount, date).category(category))
                .unwrap();
        }
    }

    async fn render(state: TransactionState, query: &str) -> (StatusCode, Html) {
        let filters: ListQuery = serde_urlencoded::from_str(query).unwrap();
        let view: TableView = serde_urlencoded::from_str(query).unwrap();

        let response = get_dashboard_page(State(state), Query(filters), Query(view)).await;
        let status = response.status();

        (status, parse_html_document(response).await)
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Could not find chart with id {chart_id}"
        );
    }

    #[track_caller]
    fn assert_table_row_count(html: &Html, want: usize) {
        let got = html
            .select(&Selector::parse("tbody tr[data-transaction-id]").unwrap())
            .count();
        assert_eq!(got, want, "want {want} table rows, got {got}");
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let state = get_test_transaction_state();
        insert_sample_transactions(&state);

        let (status, html) = render(state, "").await;

        assert_eq!(status, StatusCode::OK);
        assert_valid_html(&html);
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$125.00");
        assert_eq!(must_get_text(&html, "#total-expense .amount"), "$40.00");
        assert_eq!(must_get_text(&html, "#net-balance .amount"), "$85.00");
        assert_chart_exists(&html, "income-expense-chart");
        assert_chart_exists(&html, "expenses-chart");
        assert_table_row_count(&html, 3);
    }

    #[tokio::test]
    async fn shows_empty_states_without_data() {
        let state = get_test_transaction_state();

        let (status, html) = render(state, "").await;

        assert_eq!(status, StatusCode::OK);
        assert_valid_html(&html);
        assert_eq!(must_get_text(&html, "#net-balance .amount"), "$0.00");
        assert_chart_exists(&html, "income-expense-chart-empty");
        assert_chart_exists(&html, "expenses-chart-empty");
        assert_eq!(
            must_get_text(&html, "td[data-empty-state]"),
            "No transactions found."
        );
    }

    #[tokio::test]
    async fn filters_narrow_table_but_not_totals() {
        let state = get_test_transaction_state();
        insert_sample_transactions(&state);

        let (status, html) = render(state, "type=income&startDate=2024-02-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_table_row_count(&html, 1);
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$125.00");
        assert_eq!(must_get_text(&html, "#total-expense .amount"), "$40.00");
        assert_eq!(
            must_get_text(&html, "#table-count"),
            "Showing 1 of 1 transactions"
        );
    }

    #[tokio::test]
    async fn invalid_filters_show_error_message() {
        let state = get_test_transaction_state();
        insert_sample_transactions(&state);

        let (status, html) = render(state, "startDate=yesterday").await;

        assert_eq!(status, StatusCode::OK);
        assert!(must_get_text(&html, "#dashboard-error").starts_with("Invalid filters"));
        assert_table_row_count(&html, 0);
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$125.00");
    }

    #[tokio::test]
    async fn table_pages_through_filtered_list() {
        let state = get_test_transaction_state();
        for day in 1..=15 {
            state
                .store
                .insert(
                    Transaction::build(
                        TransactionType::Expense,
                        day as f64,
                        datetime!(2024-01-01 0:00 UTC) + time::Duration::days(day),
                    )
                    .category("Food"),
                )
                .unwrap();
        }

        let (_, html) = render(state, "view_page=2").await;

        assert_table_row_count(&html, 5);
        assert_eq!(
            must_get_text(&html, "#table-count"),
            "Showing 5 of 15 transactions"
        );
    }
}
