//! The sort stage of the transaction list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::core::Transaction;

/// The column the transaction list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    Type,
    Category,
    Description,
    Amount,
}

impl SortKey {
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Type => "type",
            SortKey::Category => "category",
            SortKey::Description => "description",
            SortKey::Amount => "amount",
        }
    }

    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Type => a.type_.cmp(&b.type_),
            SortKey::Category => a.category.cmp(&b.category),
            SortKey::Description => a.description.cmp(&b.description),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// The selected sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    /// The order to switch to when the header for `key` is clicked.
    ///
    /// Clicking the column that is already sorted ascending flips it to
    /// descending, any other click sorts `key` ascending.
    pub fn toggled(self, key: SortKey) -> SortOrder {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        SortOrder { key, direction }
    }
}

/// Sort `rows` in place.
///
/// The sort is stable in both directions: rows with equal keys keep the order
/// they had on input. Descending order reverses the comparison rather than
/// the output so ties are not flipped.
pub fn sort_transactions(rows: &mut [&Transaction], order: SortOrder) {
    match order.direction {
        SortDirection::Asc => rows.sort_by(|a, b| order.key.compare(a, b)),
        SortDirection::Desc => rows.sort_by(|a, b| order.key.compare(b, a)),
    }
}
