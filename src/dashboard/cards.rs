//! Summary cards for total income, total expenses and the net balance.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, format_currency},
    transaction::Summary,
};

/// One of the summary cards at the top of the dashboard.
#[derive(Debug, Clone, PartialEq)]
struct SummaryCard {
    id: &'static str,
    title: &'static str,
    amount: f64,
    /// Percentage change since the previous period.
    trend: f64,
    amount_style: &'static str,
}

// TODO: Compute the trend from the previous month's totals once the
// dashboard fetches per-month summaries.
const PLACEHOLDER_TREND: f64 = 0.0;

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:+.0}", rounded)
    }
}

fn summary_cards(summary: Summary) -> [SummaryCard; 3] {
    let net_balance = summary.net_balance();

    [
        SummaryCard {
            id: "total-income",
            title: "Total Income",
            amount: summary.income,
            trend: PLACEHOLDER_TREND,
            amount_style: "text-green-600 dark:text-green-400",
        },
        SummaryCard {
            id: "total-expense",
            title: "Total Expenses",
            amount: summary.expense,
            trend: PLACEHOLDER_TREND,
            amount_style: "text-red-600 dark:text-red-400",
        },
        SummaryCard {
            id: "net-balance",
            title: "Net Balance",
            amount: net_balance,
            trend: PLACEHOLDER_TREND,
            amount_style: if net_balance < 0.0 {
                "text-red-600 dark:text-red-400"
            } else {
                "text-blue-600 dark:text-blue-400"
            },
        },
    ]
}

/// Renders the three summary cards from the running totals.
pub(super) fn summary_cards_view(summary: Summary) -> Markup {
    html! {
        section id="summary-cards" class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-6" {
            @for card in summary_cards(summary) {
                (summary_card(&card))
            }
        }
    }
}

fn summary_card(card: &SummaryCard) -> Markup {
    html! {
        div id=(card.id) class=(CARD_STYLE) {
            h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (card.title) }

            p class={ "amount text-3xl font-bold mt-2 " (card.amount_style) } {
                (format_currency(card.amount))
            }

            @if card.trend != 0.0 {
                p class="trend text-sm text-gray-500 dark:text-gray-400 mt-1" {
                    (format_percentage(card.trend)) "% from last month"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::{
        dashboard::cards::{format_percentage, summary_cards_view},
        transaction::Summary,
    };

    fn render(summary: Summary) -> Html {
        Html::parse_fragment(&html! { (summary_cards_view(summary)) }.into_string())
    }

    fn card_amount(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} .amount")).unwrap();

        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No card found with id {id}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn shows_totals_and_net_balance() {
        let html = render(Summary {
            income: 125.0,
            expense: 40.0,
        });

        assert_eq!(card_amount(&html, "total-income"), "$125.00");
        assert_eq!(card_amount(&html, "total-expense"), "$40.00");
        assert_eq!(card_amount(&html, "net-balance"), "$85.00");
    }

    #[test]
    fn negative_balance_is_shown_with_sign() {
        let html = render(Summary {
            income: 10.0,
            expense: 40.0,
        });

        assert_eq!(card_amount(&html, "net-balance"), "-$30.00");
    }

    #[test]
    fn placeholder_trend_is_hidden() {
        let html = render(Summary::default());

        let trends = html.select(&Selector::parse(".trend").unwrap()).count();
        assert_eq!(trends, 0);
    }

    #[test]
    fn formats_percentage_without_negative_zero() {
        assert_eq!(format_percentage(-0.2), "0");
        assert_eq!(format_percentage(12.4), "+12");
        assert_eq!(format_percentage(-7.6), "-8");
    }
}
