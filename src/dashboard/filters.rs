//! The filter panel above the transactions table.

use maud::{Markup, html};

use crate::{
    dashboard::categories::filter_options,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{ListQuery, Transaction, TransactionType},
};

/// Renders a GET form that reloads the dashboard with the chosen filters.
///
/// Changing the type clears the category so that the category choices are
/// rebuilt for the new type.
pub(super) fn filters_view(filters: &ListQuery, snapshot: &[Transaction]) -> Markup {
    let selected_type = filters
        .type_
        .as_deref()
        .and_then(|text| text.parse::<TransactionType>().ok());
    let selected_category = filters.category.as_deref().unwrap_or_default();
    let categories = filter_options(selected_type, snapshot);

    html! {
        section id="filters" class="w-full mb-6 p-4 rounded-lg bg-white dark:bg-gray-800"
        {
            h2 class="text-lg font-semibold mb-4" { "Filters" }

            form
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="grid grid-cols-1 md:grid-cols-3 lg:grid-cols-6 gap-4 items-end"
            {
                div
                {
                    label for="filter-type" class=(FORM_LABEL_STYLE) { "Type" }
                    select
                        id="filter-type"
                        name="type"
                        class=(FORM_TEXT_INPUT_STYLE)
                        onchange="this.form.category.value = ''; this.form.submit();"
                    {
                        option value="" selected[selected_type.is_none()] { "All" }
                        @for type_ in [TransactionType::Income, TransactionType::Expense] {
                            option value=(type_) selected[selected_type == Some(type_)] {
                                (type_label(type_))
                            }
                        }
                    }
                }

                div
                {
                    label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="filter-category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[selected_category.is_empty()] { "All" }
                        @for category in &categories {
                            option value=(category) selected[category == selected_category] {
                                (category)
                            }
                        }
                    }
                }

                div
                {
                    label for="filter-start-date" class=(FORM_LABEL_STYLE) { "Start Date" }
                    input
                        id="filter-start-date"
                        type="date"
                        name="startDate"
                        value=(filters.start_date.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="filter-end-date" class=(FORM_LABEL_STYLE) { "End Date" }
                    input
                        id="filter-end-date"
                        type="date"
                        name="endDate"
                        value=(filters.end_date.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Clear" }
            }
        }
    }
}

pub(super) fn type_label(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    }
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::{
        dashboard::{
            categories::{EXPENSE_CATEGORIES, INCOME_CATEGORIES},
            filters::filters_view,
        },
        test_utils::{assert_form_select_with_value, must_get_form},
        transaction::ListQuery,
    };

    fn render(filters: &ListQuery) -> Html {
        Html::parse_fragment(&html! { (filters_view(filters, &[])) }.into_string())
    }

    fn category_options(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("select[name=category] option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn defaults_to_all() {
        let html = render(&ListQuery::default());

        let form = must_get_form(&html, "/");
        assert_form_select_with_value(&form, "type", "");
        assert_form_select_with_value(&form, "category", "");
        assert_eq!(
            category_options(&html).len(),
            INCOME_CATEGORIES.len() + EXPENSE_CATEGORIES.len()
        );
    }

    #[test]
    fn type_narrows_categories_and_keeps_selection() {
        let html = render(&ListQuery {
            type_: Some("expense".to_owned()),
            category: Some("Rent".to_owned()),
            start_date: Some("2024-01-01".to_owned()),
            ..Default::default()
        });

        let form = must_get_form(&html, "/");
        assert_form_select_with_value(&form, "type", "expense");
        assert_form_select_with_value(&form, "category", "Rent");
        assert_eq!(category_options(&html), EXPENSE_CATEGORIES.to_vec());

        let start_date = html
            .select(&Selector::parse("input[name=startDate]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(start_date, Some("2024-01-01"));
    }

    #[test]
    fn has_clear_link() {
        let html = render(&ListQuery::default());

        let clear = html
            .select(&Selector::parse("#filters a").unwrap())
            .next()
            .expect("No clear link found");
        assert_eq!(clear.value().attr("href"), Some("/"));
        assert_eq!(clear.text().collect::<String>(), "Clear");
    }
}
