//! The pages for creating, editing and deleting a transaction.
//!
//! The form is checked locally for missing fields before the values are
//! handed to the transaction service as a JSON payload. The result of a
//! successful write is dispatched to the dashboard state loaded just before
//! the write, and the updated dashboard is rendered. Failures re-render the
//! form with the field errors and a blocking alert.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, Query};
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    Error,
    dashboard::{
        categories::suggestions_for,
        client_state::{Action, ClientState},
        filters::type_label,
        handlers::{dashboard_after_write, load_client_state},
        table::dashboard_url,
    },
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, base,
    },
    transaction::{
        FieldError, ListQuery, Transaction, TransactionState, TransactionType, create_transaction,
        delete_transaction, get_transaction, parse_transaction_id, update_transaction,
    },
};

const SAVE_FAILED_ALERT: &str = "Could not save the transaction. Please fix the highlighted fields.";

/// The raw values submitted by the transaction form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFormData {
    /// "income" or "expense".
    #[serde(rename = "type", default)]
    pub type_: String,
    /// The amount in dollars.
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// A calendar date, e.g. "2024-01-31".
    #[serde(default)]
    pub date: String,
}

impl TransactionFormData {
    fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            type_: transaction.type_.to_string(),
            amount: transaction.amount.to_string(),
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            date: transaction.date.date().to_string(),
        }
    }

    /// Check that every required field is filled in.
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.type_.parse::<TransactionType>().is_err() {
            errors.push(FieldError::new("type", "Choose income or expense"));
        }

        if self.parsed_amount().is_none() {
            errors.push(FieldError::new("amount", "Enter a valid amount"));
        }

        for (field, value, message) in [
            ("description", &self.description, "Description is required"),
            ("category", &self.category, "Category is required"),
            ("date", &self.date, "Date is required"),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, message));
            }
        }

        errors
    }

    fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }

    /// The JSON payload accepted by the transaction service.
    fn to_payload(&self) -> Value {
        json!({
            "type": self.type_,
            "amount": self.parsed_amount(),
            "description": self.description.trim(),
            "category": self.category.trim(),
            "date": self.date.trim(),
        })
    }
}

/// Whether the form creates a new transaction or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FormMode {
    Create,
    Edit(TransactionId),
}

impl FormMode {
    fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Add Transaction",
            FormMode::Edit(_) => "Edit Transaction",
        }
    }

    fn action(self) -> String {
        match self {
            FormMode::Create => endpoints::NEW_TRANSACTION_VIEW.to_owned(),
            FormMode::Edit(id) => format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, id),
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Update",
        }
    }
}

/// Renders the page for adding a transaction.
pub async fn get_new_transaction_page() -> Response {
    let data = TransactionFormData {
        type_: TransactionType::Expense.to_string(),
        date: OffsetDateTime::now_utc().date().to_string(),
        ..Default::default()
    };

    transaction_form_page(FormMode::Create, &data, &[]).into_response()
}

/// Creates a transaction from the submitted form and shows the updated dashboard.
pub async fn create_transaction_page_endpoint(
    State(state): State<TransactionState>,
    Form(data): Form<TransactionFormData>,
) -> Response {
    let errors = data.validate();
    if !errors.is_empty() {
        return invalid_form_response(FormMode::Create, &data, &errors);
    }

    let filters = ListQuery::default();
    let mut client = match load_client_state(&state.store, filters, &state.pagination_config) {
        Ok(client) => client,
        Err(error) => return error.into_page_response(),
    };

    match create_transaction(&state.store, &data.to_payload()) {
        Ok(transaction) => {
            tracing::debug!("created transaction {}", transaction.id);
            client.dispatch(Action::Created(transaction));
            show_dashboard(&state, &client)
        }
        Err(Error::Validation(errors)) => invalid_form_response(FormMode::Create, &data, &errors),
        Err(error) => error.into_page_response(),
    }
}

/// Renders the form for editing an existing transaction.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction = match parse_transaction_id(&transaction_id)
        .and_then(|id| get_transaction(&state.store, id))
    {
        Ok(transaction) => transaction,
        Err(error) => return error.into_page_response(),
    };

    let data = TransactionFormData::from_transaction(&transaction);

    transaction_form_page(FormMode::Edit(transaction.id), &data, &[]).into_response()
}

/// Saves the edited transaction and shows the updated dashboard.
pub async fn update_transaction_page_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    Form(data): Form<TransactionFormData>,
) -> Response {
    let id = match parse_transaction_id(&transaction_id) {
        Ok(id) => id,
        Err(error) => return error.into_page_response(),
    };

    let errors = data.validate();
    if !errors.is_empty() {
        return invalid_form_response(FormMode::Edit(id), &data, &errors);
    }

    let filters = ListQuery::default();
    let mut client = match load_client_state(&state.store, filters, &state.pagination_config) {
        Ok(client) => client,
        Err(error) => return error.into_page_response(),
    };

    match update_transaction(&state.store, id, &data.to_payload()) {
        Ok(transaction) => {
            client.dispatch(Action::Updated(transaction));
            show_dashboard(&state, &client)
        }
        Err(Error::Validation(errors)) => invalid_form_response(FormMode::Edit(id), &data, &errors),
        Err(error) => error.into_page_response(),
    }
}

/// Deletes a transaction and shows the dashboard with the same filters as
/// the page the delete came from.
pub async fn delete_transaction_page_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    Query(filters): Query<ListQuery>,
) -> Response {
    let id = match parse_transaction_id(&transaction_id) {
        Ok(id) => id,
        Err(error) => return error.into_page_response(),
    };

    let mut client = match load_client_state(&state.store, filters, &state.pagination_config) {
        Ok(client) => client,
        Err(error) => return error.into_page_response(),
    };

    match delete_transaction(&state.store, id) {
        Ok(()) => {
            client.dispatch(Action::Deleted(id));
            show_dashboard(&state, &client)
        }
        Err(error) => error.into_page_response(),
    }
}

fn show_dashboard(state: &TransactionState, client: &ClientState) -> Response {
    dashboard_after_write(
        client,
        &state.pagination_config,
        &dashboard_url(&client.filters),
    )
}

fn invalid_form_response(mode: FormMode, data: &TransactionFormData, errors: &[FieldError]) -> Response {
    (
        StatusCode::BAD_REQUEST,
        transaction_form_page(mode, data, errors),
    )
        .into_response()
}

fn transaction_form_page(mode: FormMode, data: &TransactionFormData, errors: &[FieldError]) -> Markup {
    let selected_type = data
        .type_
        .parse::<TransactionType>()
        .unwrap_or(TransactionType::Expense);
    let error_for = |field: &str| -> Option<&str> {
        errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    };
    let other_errors: Vec<&FieldError> = errors
        .iter()
        .filter(|error| {
            !["type", "amount", "description", "category", "date"].contains(&error.field.as_str())
        })
        .collect();

    let content = html! {
        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (mode.title()) }

            form
                method="post"
                action=(mode.action())
                class="w-full space-y-4 md:space-y-6"
            {
                @for error in &other_errors {
                    p class=(FORM_ERROR_STYLE) { (error.message) }
                }

                div
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                    select
                        name="type"
                        id="type"
                        class=(FORM_TEXT_INPUT_STYLE)
                        onchange="document.getElementById('category').setAttribute('list', this.value + '-categories');"
                    {
                        @for type_ in [TransactionType::Expense, TransactionType::Income] {
                            option value=(type_) selected[type_ == selected_type] {
                                (type_label(type_))
                            }
                        }
                    }

                    @if let Some(message) = error_for("type") {
                        p class=(FORM_ERROR_STYLE) { (message) }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="any"
                        min="0"
                        placeholder="0.00"
                        required
                        value=(data.amount)
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(message) = error_for("amount") {
                        p class=(FORM_ERROR_STYLE) { (message) }
                    }
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        required
                        value=(data.description)
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(message) = error_for("description") {
                        p class=(FORM_ERROR_STYLE) { (message) }
                    }
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    input
                        name="category"
                        id="category"
                        type="text"
                        list={ (selected_type) "-categories" }
                        placeholder="Category"
                        required
                        value=(data.category)
                        class=(FORM_TEXT_INPUT_STYLE);

                    @for type_ in [TransactionType::Expense, TransactionType::Income] {
                        datalist id={ (type_) "-categories" }
                        {
                            @for category in suggestions_for(type_) {
                                option value=(category) {}
                            }
                        }
                    }

                    @if let Some(message) = error_for("category") {
                        p class=(FORM_ERROR_STYLE) { (message) }
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        required
                        value=(data.date)
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(message) = error_for("date") {
                        p class=(FORM_ERROR_STYLE) { (message) }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (mode.submit_label()) }

                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    let head_elements = if errors.is_empty() {
        vec![]
    } else {
        vec![HeadElement::ScriptSource(PreEscaped(format!(
            "window.addEventListener('load', () => alert('{SAVE_FAILED_ALERT}'));"
        )))]
    };

    base(mode.title(), &head_elements, &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::{Form, Query};
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        dashboard::form::{
            TransactionFormData, create_transaction_page_endpoint,
            delete_transaction_page_endpoint, get_edit_transaction_page,
            get_new_transaction_page, update_transaction_page_endpoint,
        },
        test_utils::{
            assert_form_error_message, assert_form_input_with_value,
            assert_form_select_with_value, assert_form_submit_button_with_text, assert_valid_html,
            get_test_transaction_state, must_get_form, must_get_text, parse_html_document,
        },
        transaction::{ListQuery, Transaction, TransactionState, TransactionStore, TransactionType},
    };

    #[track_caller]
    fn assert_table_row_ids(html: &Html, want: &[i64]) {
        let got: Vec<i64> = html
            .select(&Selector::parse("tbody tr[data-transaction-id]").unwrap())
            .filter_map(|row| row.value().attr("data-transaction-id")?.parse().ok())
            .collect();

        assert_eq!(got, want);
    }

    #[track_caller]
    fn assert_location_reset_to(html: &Html, location: &str) {
        let want = format!("history.replaceState(null, '', \"{location}\");");

        assert!(html.html().contains(&want), "want script {want:?} in page");
    }

    fn valid_form() -> TransactionFormData {
        TransactionFormData {
            type_: "expense".to_owned(),
            amount: "12.50".to_owned(),
            description: "Lunch".to_owned(),
            category: "Food".to_owned(),
            date: "2024-01-15".to_owned(),
        }
    }

    #[tokio::test]
    async fn new_transaction_page_has_empty_form() {
        let response = get_new_transaction_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html, "/transactions/new");
        assert_form_select_with_value(&form, "type", "expense");
        assert_form_input_with_value(&form, "amount", "number", "");
        assert_form_input_with_value(&form, "description", "text", "");
        assert_form_submit_button_with_text(&form, "Add");
    }

    #[tokio::test]
    async fn create_shows_updated_dashboard() {
        let state = get_test_transaction_state();

        let response =
            create_transaction_page_endpoint(State(state.clone()), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_table_row_ids(&html, &[1]);
        assert_eq!(must_get_text(&html, "#total-expense .amount"), "$12.50");
        assert_location_reset_to(&html, "/");

        let stored = state.store.find_by_id(1).unwrap().expect("transaction was not stored");
        assert_eq!(stored.amount, 12.5);
        assert_eq!(stored.type_, TransactionType::Expense);
        assert_eq!(stored.category, "Food");
        assert_eq!(stored.date, datetime!(2024-01-15 0:00 UTC));
    }

    #[tokio::test]
    async fn missing_fields_rerender_form_with_errors() {
        let state = get_test_transaction_state();
        let form = TransactionFormData {
            amount: "0".to_owned(),
            description: " ".to_owned(),
            category: String::new(),
            date: String::new(),
            ..valid_form()
        };

        let response = create_transaction_page_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html, "/transactions/new");
        assert_form_error_message(&form, "Enter a valid amount");
        assert_form_error_message(&form, "Description is required");
        assert_form_error_message(&form, "Category is required");
        assert_form_error_message(&form, "Date is required");
        assert!(html.html().contains("alert("));
        assert_eq!(state.store.find_by_id(1).unwrap(), None);
    }

    #[tokio::test]
    async fn service_errors_are_shown_on_form() {
        let state = get_test_transaction_state();
        let form = TransactionFormData {
            date: "2024-02-30".to_owned(),
            ..valid_form()
        };

        let response = create_transaction_page_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_document(response).await;
        let form = must_get_form(&html, "/transactions/new");
        assert_form_input_with_value(&form, "date", "date", "2024-02-30");
        assert_eq!(
            form.select(&Selector::parse("p.form-error").unwrap())
                .count(),
            1
        );
    }

    fn insert_test_transaction(state: &TransactionState) -> Transaction {
        state
            .store
            .insert(
                Transaction::build(
                    TransactionType::Income,
                    2500.0,
                    datetime!(2024-03-01 0:00 UTC),
                )
                .description("March pay")
                .category("Salary"),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn edit_page_is_prefilled() {
        let state = get_test_transaction_state();
        let transaction = insert_test_transaction(&state);

        let response =
            get_edit_transaction_page(State(state), Path(transaction.id.to_string())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html, "/transactions/1/edit");
        assert_form_select_with_value(&form, "type", "income");
        assert_form_input_with_value(&form, "amount", "number", "2500");
        assert_form_input_with_value(&form, "description", "text", "March pay");
        assert_form_input_with_value(&form, "category", "text", "Salary");
        assert_form_input_with_value(&form, "date", "date", "2024-03-01");
        assert_form_submit_button_with_text(&form, "Update");
    }

    #[tokio::test]
    async fn edit_page_for_missing_transaction_is_not_found() {
        let state = get_test_transaction_state();

        let response = get_edit_transaction_page(State(state), Path("99".to_owned())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_saves_and_shows_updated_totals() {
        let state = get_test_transaction_state();
        let transaction = insert_test_transaction(&state);
        let form = TransactionFormData {
            type_: "expense".to_owned(),
            amount: "30".to_owned(),
            ..TransactionFormData::from_transaction(&transaction)
        };

        let response = update_transaction_page_endpoint(
            State(state.clone()),
            Path(transaction.id.to_string()),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$0.00");
        assert_eq!(must_get_text(&html, "#total-expense .amount"), "$30.00");
        assert_location_reset_to(&html, "/");

        let stored = state.store.find_by_id(transaction.id).unwrap().unwrap();
        assert_eq!(stored.type_, TransactionType::Expense);
        assert_eq!(stored.amount, 30.0);
        assert_eq!(stored.description, "March pay");
        assert_eq!(stored.created_at, transaction.created_at);
    }

    #[tokio::test]
    async fn editing_only_the_description_keeps_the_exact_amount() {
        let state = get_test_transaction_state();
        let transaction = state
            .store
            .insert(
                Transaction::build(TransactionType::Expense, 12.345, datetime!(2024-03-01 0:00 UTC))
                    .description("Coffee")
                    .category("Food"),
            )
            .unwrap();

        let response =
            get_edit_transaction_page(State(state.clone()), Path(transaction.id.to_string()))
                .await;
        let html = parse_html_document(response).await;
        let form = must_get_form(&html, "/transactions/1/edit");
        assert_form_input_with_value(&form, "amount", "number", "12.345");

        let form = TransactionFormData {
            description: "Coffee and cake".to_owned(),
            ..TransactionFormData::from_transaction(&transaction)
        };
        let response = update_transaction_page_endpoint(
            State(state.clone()),
            Path(transaction.id.to_string()),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let stored = state.store.find_by_id(transaction.id).unwrap().unwrap();
        assert_eq!(stored.amount, 12.345);
        assert_eq!(stored.description, "Coffee and cake");
    }

    #[tokio::test]
    async fn delete_removes_and_shows_updated_dashboard() {
        let state = get_test_transaction_state();
        let transaction = insert_test_transaction(&state);

        let response = delete_transaction_page_endpoint(
            State(state.clone()),
            Path(transaction.id.to_string()),
            Query(ListQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_table_row_ids(&html, &[]);
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$0.00");
        assert_location_reset_to(&html, "/");
        assert_eq!(state.store.find_by_id(transaction.id).unwrap(), None);

        let response = delete_transaction_page_endpoint(
            State(state),
            Path(transaction.id.to_string()),
            Query(ListQuery::default()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_keeps_dashboard_filters() {
        let state = get_test_transaction_state();
        for (type_, amount, day) in [
            (TransactionType::Income, 50.0, 1),
            (TransactionType::Expense, 40.0, 2),
            (TransactionType::Income, 25.0, 3),
        ] {
            state
                .store
                .insert(Transaction::build(
                    type_,
                    amount,
                    datetime!(2024-03-01 0:00 UTC) + time::Duration::days(day),
                ))
                .unwrap();
        }
        let filters = ListQuery {
            type_: Some("income".to_owned()),
            ..Default::default()
        };

        let response =
            delete_transaction_page_endpoint(State(state), Path("3".to_owned()), Query(filters))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_table_row_ids(&html, &[1]);
        assert_eq!(must_get_text(&html, "#total-income .amount"), "$50.00");
        assert_eq!(must_get_text(&html, "#total-expense .amount"), "$40.00");
        assert_location_reset_to(&html, "/?type=income");
    }
}
