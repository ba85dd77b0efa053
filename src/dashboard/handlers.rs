//! The dashboard page: a month picker, the month's totals, a chart of
//! expenses per category and the month's transactions.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{DashboardChart, category_expense_chart, chart_container, charts_script},
        month::YearMonth,
        summary::{MonthlySummary, expenses_by_category, month_transactions, summarize},
    },
    endpoints,
    html::{
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        currency_with_tooltip, format_signed_amount,
    },
    navigation::NavBar,
    record_store::RecordStoreClient,
    timezone::local_today,
    transaction::{Transaction, TransactionType},
};

const CATEGORY_CHART_ID: &str = "category-expense-chart";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub record_store: RecordStoreClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to show as `YYYY-MM`, defaults to the current month.
    pub month: Option<String>,
}

/// Display a page with an overview of the user's finances for one month.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let month = match query.month.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => YearMonth::parse(raw)
            .inspect_err(|error| tracing::warn!("Rejected dashboard month: {error}"))?,
        None => YearMonth::of(local_today(&state.local_timezone)?),
    };

    let transactions = state
        .record_store
        .list_transactions()
        .await
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))?;

    let rows = month_transactions(&transactions, month);
    let summary = summarize(&rows);
    let expenses = expenses_by_category(&rows);

    let chart = (!expenses.is_empty()).then(|| DashboardChart {
        id: CATEGORY_CHART_ID,
        options: category_expense_chart(&expenses).to_string(),
    });

    Ok(dashboard_view(month, &summary, chart.as_ref(), &rows).into_response())
}

fn month_picker(month: YearMonth) -> Markup {
    let month_url = |month: YearMonth| format!("{}?month={month}", endpoints::DASHBOARD_VIEW);

    html! {
        form method="get" action=(endpoints::DASHBOARD_VIEW) class="flex items-center gap-3"
        {
            a href=(month_url(month.previous())) class=(LINK_STYLE) aria-label="Previous month" { "‹" }

            label for="month" class="sr-only" { "Month" }
            input
                type="month"
                name="month"
                id="month"
                value=(month)
                onchange="this.form.requestSubmit()"
                class=(FORM_TEXT_INPUT_STYLE);

            a href=(month_url(month.next())) class=(LINK_STYLE) aria-label="Next month" { "›" }
        }
    }
}

fn summary_card(title: &str, id: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div id=(id) class="p-4 rounded bg-white dark:bg-gray-800 shadow text-center"
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold " (amount_style) } { (currency_with_tooltip(amount)) }
        }
    }
}

fn summary_cards(summary: &MonthlySummary) -> Markup {
    let balance = summary.balance();
    let balance_style = if balance >= 0.0 {
        "text-green-700 dark:text-green-300"
    } else {
        "text-red-700 dark:text-red-300"
    };

    html! {
        section class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full"
        {
            (summary_card("Total income", "total-income", summary.income, "text-blue-700 dark:text-blue-300"))
            (summary_card("Total expenses", "total-expense", summary.expense, "text-red-700 dark:text-red-300"))
            (summary_card("Balance", "balance", balance, balance_style))
        }
    }
}

fn amount_style(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Income => "text-blue-700 dark:text-blue-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn month_transaction_list(rows: &[&Transaction]) -> Markup {
    html! {
        section class="p-4 rounded bg-white dark:bg-gray-800 shadow max-h-[420px] overflow-y-auto"
        {
            h2 class="text-lg font-semibold mb-2" { "This month's transactions" }

            @if rows.is_empty() {
                p data-empty-state="true" class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions for this month."
                }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in rows {
                        li class="flex justify-between py-3" data-transaction-id=(transaction.id)
                        {
                            div
                            {
                                p class="text-sm text-gray-500 dark:text-gray-400"
                                {
                                    time datetime=(transaction.date) { (transaction.date) }
                                }
                                p
                                {
                                    (transaction.description) " "
                                    span class="text-xs text-gray-500" { "(" (transaction.category) ")" }
                                }
                            }

                            p class={ "font-bold " (amount_style(transaction.type_)) }
                            {
                                (format_signed_amount(transaction.type_, transaction.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn dashboard_view(
    month: YearMonth,
    summary: &MonthlySummary,
    chart: Option<&DashboardChart>,
    rows: &[&Transaction],
) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-center gap-4"
                {
                    h1 class="text-xl font-bold" { "Dashboard" }

                    (month_picker(month))
                }

                (summary_cards(summary))

                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    section class="p-4 rounded bg-white dark:bg-gray-800 shadow flex items-center justify-center min-h-[420px]"
                    {
                        @if let Some(chart) = chart {
                            (chart_container(chart))
                        } @else {
                            p data-empty-state="true" class="text-gray-500 dark:text-gray-400"
                            {
                                "No expense data for this month."
                            }
                        }
                    }

                    (month_transaction_list(rows))
                }
            }
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(std::slice::from_ref(chart)),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}
