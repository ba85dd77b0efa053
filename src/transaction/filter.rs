//! The filter stage of the transaction list: category tab, free-text search,
//! and inclusive date and amount bounds.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use super::core::Transaction;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The category tab selected on the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    All,
    Only(String),
}

impl CategorySelection {
    /// The query value for "every category".
    pub const ALL_QUERY_VALUE: &'static str = "ALL";

    /// Interpret the `category` query parameter, where a missing value, an
    /// empty string and `ALL` all select every category.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(Self::ALL_QUERY_VALUE) => CategorySelection::All,
            Some(label) => CategorySelection::Only(label.to_owned()),
        }
    }

    pub fn as_query_value(&self) -> &str {
        match self {
            CategorySelection::All => Self::ALL_QUERY_VALUE,
            CategorySelection::Only(label) => label,
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(label) => label == category,
        }
    }
}

/// The active filter settings of the transaction list.
///
/// A row is kept only if it satisfies every setting. Unset bounds and an empty
/// search term do not constrain anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search_term: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub category: CategorySelection,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.category.matches(&transaction.category)
            && self.matches_search_term(transaction)
            && self.start_date.is_none_or(|start| transaction.date >= start)
            && self.end_date.is_none_or(|end| transaction.date <= end)
            && self.min_amount.is_none_or(|min| transaction.amount >= min)
            && self.max_amount.is_none_or(|max| transaction.amount <= max)
    }

    fn matches_search_term(&self, transaction: &Transaction) -> bool {
        if self.search_term.is_empty() {
            return true;
        }

        let needle = self.search_term.to_lowercase();
        let date = transaction.date.to_string();
        let amount = transaction.amount.to_string();
        let searchable_fields = [
            date.as_str(),
            transaction.description.as_str(),
            amount.as_str(),
            transaction.type_.as_str(),
            transaction.category.as_str(),
        ];

        searchable_fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Keep the transactions that pass the filter, preserving their order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

/// Parse an amount bound from the filter form.
///
/// The empty string means "no bound", never zero. Text that is not a number
/// is ignored as well.
pub fn parse_amount_bound(raw: &str) -> Option<f64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    raw.parse::<f64>()
        .inspect_err(|error| tracing::debug!("Ignoring amount bound {raw:?}: {error}"))
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Parse a `YYYY-MM-DD` date bound from the filter form, where the empty
/// string means "no bound".
pub fn parse_date_bound(raw: &str) -> Option<Date> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    Date::parse(raw, DATE_FORMAT)
        .inspect_err(|error| tracing::debug!("Ignoring date bound {raw:?}: {error}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::core::{Transaction, TransactionType};

    use super::{CategorySelection, TransactionFilter, parse_amount_bound, parse_date_bound};

    fn transaction(
        id: i64,
        date: time::Date,
        description: &str,
        category: &str,
        amount: f64,
        type_: TransactionType,
    ) -> Transaction {
        Transaction {
            id,
            date,
            description: description.to_owned(),
            category: category.to_owned(),
            amount,
            type_,
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(1, date!(2024 - 07 - 01), "Lunch with Ken", "食費", 900.0, TransactionType::Expense),
            transaction(2, date!(2024 - 07 - 02), "Groceries", "食費", 3200.0, TransactionType::Expense),
            transaction(3, date!(2024 - 07 - 03), "LUNCH box", "交際費", 650.0, TransactionType::Expense),
            transaction(4, date!(2024 - 07 - 10), "Train pass", "交通費", 10000.0, TransactionType::Expense),
            transaction(5, date!(2024 - 07 - 25), "Salary", "給与", 250000.0, TransactionType::Income),
            transaction(6, date!(2024 - 08 - 01), "lunch", "食費", 1200.0, TransactionType::Expense),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn default_filter_keeps_everything() {
        let transactions = sample_transactions();

        let got = TransactionFilter::default().apply(&transactions);

        assert_eq!(ids(&got), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn category_and_search_term_must_both_match() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            search_term: "lunch".to_owned(),
            category: CategorySelection::Only("食費".to_owned()),
            ..Default::default()
        };

        let got = filter.apply(&transactions);

        assert_eq!(ids(&got), vec![1, 6]);
        for transaction in got {
            assert_eq!(transaction.category, "食費");
            assert!(transaction.description.to_lowercase().contains("lunch"));
        }
    }

    #[test]
    fn search_term_matches_any_field_case_insensitively() {
        let transactions = sample_transactions();
        let cases = [
            ("2024-07-1", vec![4]),
            ("income", vec![5]),
            ("3200", vec![2]),
            ("交通", vec![4]),
            ("salary", vec![5]),
        ];

        for (term, want) in cases {
            let filter = TransactionFilter {
                search_term: term.to_owned(),
                ..Default::default()
            };

            let got = filter.apply(&transactions);

            assert_eq!(ids(&got), want, "search term {term:?}");
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            start_date: Some(date!(2024 - 07 - 02)),
            end_date: Some(date!(2024 - 07 - 10)),
            min_amount: Some(650.0),
            max_amount: Some(10000.0),
            ..Default::default()
        };

        let got = filter.apply(&transactions);

        assert_eq!(ids(&got), vec![2, 3, 4]);
    }

    #[test]
    fn filter_output_is_exactly_the_matching_rows() {
        let transactions = sample_transactions();
        let filters = [
            TransactionFilter {
                search_term: "l".to_owned(),
                min_amount: Some(1000.0),
                ..Default::default()
            },
            TransactionFilter {
                category: CategorySelection::Only("食費".to_owned()),
                end_date: Some(date!(2024 - 07 - 31)),
                ..Default::default()
            },
            TransactionFilter {
                search_term: "EXPENSE".to_owned(),
                start_date: Some(date!(2024 - 07 - 03)),
                max_amount: Some(5000.0),
                ..Default::default()
            },
        ];

        for filter in filters {
            let got = filter.apply(&transactions);
            let kept = ids(&got);

            for transaction in &transactions {
                let satisfies_all = filter.category.matches(&transaction.category)
                    && filter.start_date.is_none_or(|start| transaction.date >= start)
                    && filter.end_date.is_none_or(|end| transaction.date <= end)
                    && filter.min_amount.is_none_or(|min| transaction.amount >= min)
                    && filter.max_amount.is_none_or(|max| transaction.amount <= max)
                    && filter.matches(transaction);

                assert_eq!(
                    kept.contains(&transaction.id),
                    satisfies_all,
                    "transaction {} with filter {filter:?}",
                    transaction.id
                );
            }
        }
    }

    #[test]
    fn empty_amount_bound_is_unconstrained() {
        assert_eq!(parse_amount_bound(""), None);
        assert_eq!(parse_amount_bound("   "), None);
        assert_eq!(parse_amount_bound("0"), Some(0.0));

        let transactions = vec![transaction(
            1,
            date!(2024 - 07 - 01),
            "Refund",
            "その他収入",
            500.0,
            TransactionType::Income,
        )];
        let filter = TransactionFilter {
            min_amount: parse_amount_bound(""),
            max_amount: parse_amount_bound(""),
            ..Default::default()
        };

        assert_eq!(filter.apply(&transactions).len(), 1);
    }

    #[test]
    fn malformed_bounds_are_ignored() {
        assert_eq!(parse_amount_bound("abc"), None);
        assert_eq!(parse_amount_bound("NaN"), None);
        assert_eq!(parse_date_bound("2024-13-01"), None);
        assert_eq!(parse_date_bound(""), None);
        assert_eq!(parse_date_bound("2024-07-05"), Some(date!(2024 - 07 - 05)));
    }

    #[test]
    fn category_selection_from_query() {
        assert_eq!(CategorySelection::from_query(None), CategorySelection::All);
        assert_eq!(CategorySelection::from_query(Some("")), CategorySelection::All);
        assert_eq!(CategorySelection::from_query(Some("ALL")), CategorySelection::All);
        assert_eq!(
            CategorySelection::from_query(Some("食費")),
            CategorySelection::Only("食費".to_owned())
        );
    }
}
