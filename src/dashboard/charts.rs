//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations from the unfiltered snapshot:
//! - **Income vs Expense**: Pie chart of the share of each total
//! - **Monthly Expenses**: Stacked bar chart of the last six months of
//!   expenses grouped by category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Label, Tooltip, Trigger,
    },
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{group_monthly_expenses_by_category, income_expense_slices},
    html::HeadElement,
    transaction::{Summary, Transaction},
};

/// The URL of the ECharts library.
pub(super) const ECHARTS_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string, or `None` if there is no data to plot.
    pub options: Option<String>,
    /// The message to show in place of the chart when there is no data.
    pub empty_message: &'static str,
}

/// Build the dashboard charts from the running totals and the unfiltered snapshot.
pub(super) fn build_dashboard_charts(
    summary: Summary,
    transactions: &[Transaction],
) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "income-expense-chart",
            options: income_expense_chart(summary).map(|chart| chart.to_string()),
            empty_message: "No income or expenses yet.",
        },
        DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(transactions).map(|chart| chart.to_string()),
            empty_message: "No expenses yet.",
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
///
/// Charts without data get a message instead of a container.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-6"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    @if chart.options.is_some() {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                        {}
                    } @else {
                        div
                            id={ (chart.id) "-empty" }
                            class="min-h-[380px] flex items-center justify-center
                                rounded bg-white dark:bg-gray-800 text-gray-500"
                        {
                            (chart.empty_message)
                        }
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .filter_map(|chart| chart.options.as_ref().map(|options| (chart.id, options)))
        .map(|(id, options)| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{id}");
                    const chart = echarts.init(chartDom);
                    const option = {options};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The share of income and expenses, or `None` if both are zero.
fn income_expense_chart(summary: Summary) -> Option<Chart> {
    let slices = income_expense_slices(summary);

    if slices.is_empty() {
        return None;
    }

    let data: Vec<(f64, &str)> = slices
        .into_iter()
        .map(|(name, value)| (value, name))
        .collect();

    Some(
        Chart::new()
            .title(
                Title::new()
                    .text("Total Income vs Expense")
                    .subtext("Overall financial balance"),
            )
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Item)
                    .value_formatter(currency_formatter()),
            )
            .legend(Legend::new().bottom("1%"))
            .color(vec![Color::from("#00C49F"), Color::from("#FF8042")])
            .series(
                Pie::new()
                    .name("Total")
                    .radius("60%")
                    .label(Label::new().formatter("{b} {d}%"))
                    .data(data),
            ),
    )
}

/// Monthly expenses stacked by category, or `None` if there are no expenses.
fn expenses_chart(transactions: &[Transaction]) -> Option<Chart> {
    let breakdown = group_monthly_expenses_by_category(transactions);

    if breakdown.months.is_empty() {
        return None;
    }

    let labels: Vec<String> = breakdown.months.iter().map(|month| month.label()).collect();

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("Last six months, grouped by category")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for (category, data) in breakdown.categories.into_iter().zip(breakdown.totals) {
        let name = if category.is_empty() {
            "Uncategorized".to_owned()
        } else {
            category
        };

        chart = chart.series(
            Bar::new()
                .name(name)
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    Some(chart)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        dashboard::charts::build_dashboard_charts,
        transaction::{Summary, Transaction, TransactionType},
    };

    #[test]
    fn charts_are_empty_without_data() {
        let charts = build_dashboard_charts(Summary::default(), &[]);

        assert!(charts.iter().all(|chart| chart.options.is_none()));
    }

    #[test]
    fn expense_chart_lists_categories() {
        let transactions = [Transaction {
            id: 1,
            type_: TransactionType::Expense,
            amount: 12.0,
            description: String::new(),
            category: "Transport".to_owned(),
            date: datetime!(2024-05-02 0:00 UTC),
            created_at: datetime!(2024-05-02 0:00 UTC),
        }];

        let charts = build_dashboard_charts(
            Summary {
                income: 0.0,
                expense: 12.0,
            },
            &transactions,
        );

        let pie = charts[0].options.as_deref().unwrap();
        assert!(pie.contains("Expense"));
        assert!(!pie.contains("\"Income\""));

        let bars = charts[1].options.as_deref().unwrap();
        assert!(bars.contains("Transport"));
        assert!(bars.contains("2024-05"));
    }
}
