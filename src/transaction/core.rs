//! The transaction model exchanged with the record store.

use serde::{Deserialize, Serialize};
use time::Date;

/// The ID the record store assigns to a transaction.
pub type TransactionId = i64;

/// The labels offered by the transaction form and the category tabs.
///
/// The record store treats categories as free text, so transactions created
/// elsewhere may carry a label that is not in this list.
pub const CATEGORIES: [&str; 9] = [
    "食費",
    "交通費",
    "光熱費",
    "通信費",
    "交際費",
    "趣味・娯楽",
    "給与",
    "その他収入",
    "その他支出",
];

/// Whether money came in or went out.
///
/// Variants are declared in the lexical order of their wire names so that the
/// derived ordering matches sorting by the type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// The value used on the wire and in form submissions.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

/// A single income or expense entry.
///
/// `amount` is always a non-negative magnitude, the direction of the money is
/// given by `type_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "transactionDate")]
    pub date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: TransactionType,
}

impl Transaction {
    /// The amount with the sign implied by the transaction type, positive for
    /// income and negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.type_ {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// The fields the user can edit, e.g. for prefilling the edit form.
    pub fn payload(&self) -> TransactionPayload {
        TransactionPayload {
            date: self.date,
            description: self.description.clone(),
            category: self.category.clone(),
            amount: self.amount,
            type_: self.type_,
        }
    }
}

/// The body sent to the record store when creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    #[serde(rename = "transactionDate")]
    pub date: Date,
    pub description: String,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: TransactionType,
}

impl TransactionPayload {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            category: self.category,
            amount: self.amount,
            type_: self.type_,
        }
    }
}
