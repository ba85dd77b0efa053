//! HTML rendering for the transactions page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, EXPENSE_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        INCOME_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_signed_amount,
    },
    navigation::NavBar,
    pagination::{PAGE_SIZE_OPTIONS, PaginationIndicator, create_pagination_indicators},
};

use super::{
    core::{CATEGORIES, Transaction, TransactionType},
    filter::CategorySelection,
    sort::{SortDirection, SortKey, SortOrder},
    transactions_page::TransactionsQuery,
    view_model::{ListSettings, TransactionPage},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const COLUMN_COUNT: usize = 6;

pub(crate) fn transactions_view(
    query: &TransactionsQuery,
    settings: &ListSettings,
    page: &TransactionPage<'_>,
    max_pages: u64,
) -> Markup {
    let export_url = query.to_url(endpoints::EXPORT_TRANSACTIONS);

    let content = html! {
        (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    div class="flex gap-4"
                    {
                        a href=(export_url) class=(LINK_STYLE) { "Export CSV" }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "New Transaction"
                        }
                    }
                }

                (category_tabs(query, &settings.filter.category))

                (filter_form(query))

                div class="relative overflow-x-auto shadow-md rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (sortable_header(query, settings.sort, SortKey::Date, "Date"))
                                (sortable_header(query, settings.sort, SortKey::Type, "Type"))
                                (sortable_header(query, settings.sort, SortKey::Category, "Category"))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                (sortable_header(query, settings.sort, SortKey::Amount, "Amount"))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &page.rows {
                                (transaction_row(transaction))
                            }

                            @if page.rows.is_empty() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td
                                        colspan=(COLUMN_COUNT)
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }

                (page_footer(query, page, max_pages))
            }
        }
    };

    base("Transactions", &[], &content)
}

fn tab_style(is_current: bool) -> &'static str {
    if is_current {
        "inline-block px-4 py-2 text-white bg-blue-600 rounded-lg"
    } else {
        "inline-block px-4 py-2 rounded-lg hover:text-gray-900 \
        hover:bg-gray-100 dark:hover:bg-gray-800 dark:hover:text-white"
    }
}

fn category_tabs(query: &TransactionsQuery, selected: &CategorySelection) -> Markup {
    let tabs = std::iter::once(("All", CategorySelection::All)).chain(
        CATEGORIES
            .iter()
            .map(|label| (*label, CategorySelection::Only((*label).to_owned()))),
    );

    html! {
        nav aria-label="Categories" class="overflow-x-auto"
        {
            ul class="flex gap-2 text-sm font-medium text-center whitespace-nowrap"
            {
                @for (label, selection) in tabs {
                    @let is_current = &selection == selected;

                    li
                    {
                        a
                            href=(query.with_category(&selection).to_url(endpoints::TRANSACTIONS_VIEW))
                            class=(tab_style(is_current))
                            aria-current=[is_current.then_some("page")]
                        {
                            (label)
                        }
                    }
                }
            }
        }
    }
}

/// The search and bounds form.
///
/// Submitting it drops the page parameter so the result starts on the first
/// page. The tab, sort and page size ride along as hidden inputs.
fn filter_form(query: &TransactionsQuery) -> Markup {
    let hidden = [
        ("category", query.category.as_deref()),
        ("sort", query.sort.as_deref()),
        ("order", query.order.as_deref()),
        ("per_page", query.per_page.as_deref()),
    ];
    let reset_url = query
        .without_filters()
        .to_url(endpoints::TRANSACTIONS_VIEW);

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            id="transaction-filters"
            class="grid grid-cols-2 md:grid-cols-6 gap-4 items-end p-4 rounded bg-white dark:bg-gray-800"
        {
            @for (name, value) in hidden {
                @if let Some(value) = value {
                    input type="hidden" name=(name) value=(value);
                }
            }

            div class="col-span-2 md:col-span-1"
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    name="q"
                    id="q"
                    value=[query.q.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="start"
                    id="start"
                    value=[query.start.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="end"
                    id="end"
                    value=[query.end.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="min" class=(FORM_LABEL_STYLE) { "Min amount" }
                input
                    type="text"
                    inputmode="decimal"
                    name="min"
                    id="min"
                    value=[query.min.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="max" class=(FORM_LABEL_STYLE) { "Max amount" }
                input
                    type="text"
                    inputmode="decimal"
                    name="max"
                    id="max"
                    value=[query.max.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4 items-center"
            {
                button
                    type="submit"
                    class="px-4 py-2 text-white bg-blue-600 rounded hover:bg-blue-700"
                {
                    "Apply"
                }

                a href=(reset_url) class=(LINK_STYLE) { "Reset" }
            }
        }
    }
}

fn sortable_header(
    query: &TransactionsQuery,
    current: SortOrder,
    key: SortKey,
    label: &str,
) -> Markup {
    let is_sorted = current.key == key;
    let aria_sort = is_sorted.then_some(match current.direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    });
    let arrow = match (is_sorted, current.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ▲",
        (true, SortDirection::Desc) => " ▼",
    };
    let href = query
        .with_sort(current.toggled(key))
        .to_url(endpoints::TRANSACTIONS_VIEW);

    html! {
        th scope="col" class=(TABLE_CELL_STYLE) aria-sort=[aria_sort]
        {
            a href=(href) class="hover:underline" data-sort-key=(key.as_query_value())
            {
                (label) (arrow)
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let (badge_style, amount_style) = match transaction.type_ {
        TransactionType::Income => (INCOME_BADGE_STYLE, "text-green-700 dark:text-green-300"),
        TransactionType::Expense => (EXPENSE_BADGE_STYLE, "text-red-700 dark:text-red-300"),
    };
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.description
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(badge_style) { (transaction.type_.label()) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class={ "px-6 py-4 text-right font-semibold " (amount_style) }
            {
                (format_signed_amount(transaction.type_, transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn page_footer(query: &TransactionsQuery, page: &TransactionPage<'_>, max_pages: u64) -> Markup {
    let first_row = page.page_index * page.page_size + 1;
    let last_row = first_row + page.rows.len() as u64 - 1;

    html! {
        div class="flex flex-wrap justify-between items-center gap-4 text-sm"
        {
            @if page.rows.is_empty() {
                p { "0 of 0" }
            } @else {
                p { (first_row) "–" (last_row) " of " (page.filtered_count) }
            }

            div class="flex gap-2 items-center"
            {
                span { "Rows per page:" }

                @for size in PAGE_SIZE_OPTIONS {
                    @if size == page.page_size {
                        span aria-current="true" class="font-bold" { (size) }
                    } @else {
                        a
                            href=(query.with_page_size(size).to_url(endpoints::TRANSACTIONS_VIEW))
                            class=(LINK_STYLE)
                        {
                            (size)
                        }
                    }
                }
            }

            (pagination_nav(query, page.page_index, page.page_count, max_pages))
        }
    }
}

fn pagination_nav(query: &TransactionsQuery, page_index: u64, page_count: u64, max_pages: u64) -> Markup {
    let page_url = |index: u64| {
        query
            .with_page(index)
            .to_url(endpoints::TRANSACTIONS_VIEW)
    };
    let link_style = "flex items-center justify-center px-3 h-8 leading-tight \
        text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 \
        hover:text-gray-700 dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400";

    html! {
        nav aria-label="Pages"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for indicator in create_pagination_indicators(page_index, page_count, max_pages) {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(index) => {
                                a href=(page_url(index)) class=(link_style) rel="prev" { "Back" }
                            }
                            PaginationIndicator::Page(index) => {
                                a href=(page_url(index)) class=(link_style) { (index + 1) }
                            }
                            PaginationIndicator::CurrPage(index) => {
                                span
                                    aria-current="page"
                                    class="flex items-center justify-center px-3 h-8 \
                                        text-blue-600 border border-gray-300 bg-blue-50 \
                                        dark:border-gray-700 dark:bg-gray-700 dark:text-white"
                                {
                                    (index + 1)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(link_style) { "…" }
                            }
                            PaginationIndicator::NextButton(index) => {
                                a href=(page_url(index)) class=(link_style) rel="next" { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();

        (truncated + "...", Some(description))
    }
}
