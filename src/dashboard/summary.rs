//! Totals and the per-category expense breakdown for one month.

use crate::transaction::{SortOrder, Transaction, TransactionType, sort_transactions};

use super::month::YearMonth;

/// Income and expense totals for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlySummary {
    pub income: f64,
    pub expense: f64,
}

impl MonthlySummary {
    /// Income minus expenses.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// The transactions dated in `month`, newest first.
pub fn month_transactions(transactions: &[Transaction], month: YearMonth) -> Vec<&Transaction> {
    let mut rows = transactions
        .iter()
        .filter(|transaction| month.contains(transaction.date))
        .collect::<Vec<_>>();

    // The default order is by date, newest first.
    sort_transactions(&mut rows, SortOrder::default());

    rows
}

pub fn summarize(transactions: &[&Transaction]) -> MonthlySummary {
    transactions
        .iter()
        .fold(MonthlySummary::default(), |mut summary, transaction| {
            match transaction.type_ {
                TransactionType::Income => summary.income += transaction.amount,
                TransactionType::Expense => summary.expense += transaction.amount,
            }
            summary
        })
}

/// Total expenses per category, in the order each category first appears.
pub fn expenses_by_category<'a>(transactions: &[&'a Transaction]) -> Vec<(&'a str, f64)> {
    let mut totals: Vec<(&str, f64)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense)
    {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, total)) => *total += transaction.amount,
            None => totals.push((transaction.category.as_str(), transaction.amount)),
        }
    }

    totals
}
