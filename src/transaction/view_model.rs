//! Derives the visible rows of the transaction list: filter, then sort, then
//! paginate.
//!
//! Everything here is pure and recomputed from the full transaction list on
//! every request.

use crate::pagination::{clamp_page_index, page_count, paginate};

use super::{
    core::Transaction,
    filter::TransactionFilter,
    sort::{SortOrder, sort_transactions},
};

/// Everything the user can change about which rows are shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSettings {
    pub filter: TransactionFilter,
    pub sort: SortOrder,
    /// Zero-based.
    pub page_index: u64,
    pub page_size: u64,
}

/// One page of the filtered and sorted transaction list.
#[derive(Debug, PartialEq)]
pub struct TransactionPage<'a> {
    pub rows: Vec<&'a Transaction>,
    /// The number of rows that passed the filter, across all pages.
    pub filtered_count: usize,
    /// The page that was actually shown, which may be lower than the one
    /// requested.
    pub page_index: u64,
    pub page_count: u64,
    pub page_size: u64,
}

/// Filter and sort `transactions` without paginating, e.g. for exporting.
pub fn filter_and_sort<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
    sort: SortOrder,
) -> Vec<&'a Transaction> {
    let mut rows = filter.apply(transactions);
    sort_transactions(&mut rows, sort);
    rows
}

/// Run the full pipeline and return the page to display.
///
/// A page index past the end of the filtered rows is clamped to the last
/// page.
pub fn build_page<'a>(transactions: &'a [Transaction], settings: &ListSettings) -> TransactionPage<'a> {
    let rows = filter_and_sort(transactions, &settings.filter, settings.sort);
    let filtered_count = rows.len();
    let page_index = clamp_page_index(settings.page_index, filtered_count, settings.page_size);

    if page_index != settings.page_index {
        tracing::debug!(
            "Clamped page index {} to {page_index} for {filtered_count} rows",
            settings.page_index
        );
    }

    TransactionPage {
        rows: paginate(&rows, page_index, settings.page_size).to_vec(),
        filtered_count,
        page_index,
        page_count: page_count(filtered_count, settings.page_size),
        page_size: settings.page_size,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use crate::transaction::{
        core::{Transaction, TransactionType},
        filter::{CategorySelection, TransactionFilter},
        sort::{SortDirection, SortKey, SortOrder},
    };

    use super::{ListSettings, build_page};

    fn transactions(count: i64) -> Vec<Transaction> {
        (1..=count)
            .map(|id| Transaction {
                id,
                date: Date::from_calendar_date(2024, Month::July, (id % 28 + 1) as u8).unwrap(),
                description: format!("item {id}"),
                category: if id % 3 == 0 { "食費" } else { "交通費" }.to_owned(),
                amount: (id * 100) as f64,
                type_: TransactionType::Expense,
            })
            .collect()
    }

    #[test]
    fn filters_before_sorting_and_paging() {
        let transactions = transactions(30);
        let settings = ListSettings {
            filter: TransactionFilter {
                category: CategorySelection::Only("食費".to_owned()),
                ..Default::default()
            },
            sort: SortOrder {
                key: SortKey::Amount,
                direction: SortDirection::Desc,
            },
            page_index: 0,
            page_size: 5,
        };

        let page = build_page(&transactions, &settings);

        assert_eq!(page.filtered_count, 10);
        assert_eq!(page.page_count, 2);
        let ids = page.rows.iter().map(|row| row.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![30, 27, 24, 21, 18]);
    }

    #[test]
    fn page_past_the_end_is_clamped_to_last_page() {
        let transactions = transactions(30);
        let settings = ListSettings {
            filter: TransactionFilter {
                min_amount: Some(2500.0),
                ..Default::default()
            },
            sort: SortOrder {
                key: SortKey::Amount,
                direction: SortDirection::Asc,
            },
            page_index: 4,
            page_size: 10,
        };

        let page = build_page(&transactions, &settings);

        assert_eq!(page.filtered_count, 6);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.rows.len(), 6);
    }

    #[test]
    fn empty_result_has_no_rows() {
        let transactions = transactions(5);
        let settings = ListSettings {
            filter: TransactionFilter {
                search_term: "no such thing".to_owned(),
                ..Default::default()
            },
            page_size: 20,
            ..Default::default()
        };

        let page = build_page(&transactions, &settings);

        assert!(page.rows.is_empty());
        assert_eq!(page.filtered_count, 0);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.page_count, 1);
    }
}
